pub mod circuit;
pub mod gate;
pub mod simulator;
pub mod state;

pub use circuit::Circuit;
pub use gate::Gate;
pub use simulator::{SimError, StatevectorSimulator};
pub use state::StateVector;
