pub mod molecule;
pub mod pauli;
pub mod spectrum;

pub use molecule::{ChemError, Driver, h2_hamiltonian};
pub use pauli::{Pauli, PauliOperator, PauliTerm};
pub use spectrum::lowest_eigenvalues;
