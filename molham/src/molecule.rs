use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::pauli::{Pauli, PauliOperator, PauliTerm};

/// Bohr radius in Ångström; converts the point-charge repulsion 1/R (atomic
/// units) to a bond length given in Ångström.
pub const BOHR_RADIUS_ANGSTROM: f64 = 0.52917721067;

/// Which electronic-structure coefficient set to use.
///
/// Both tables describe the same molecule in a minimal basis; they stand in
/// for the two interchangeable chemistry programs the study supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Driver {
    Sto3g,
    Sto6g,
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Driver::Sto3g => write!(f, "sto3g"),
            Driver::Sto6g => write!(f, "sto6g"),
        }
    }
}

impl FromStr for Driver {
    type Err = ChemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sto3g" | "sto-3g" => Ok(Driver::Sto3g),
            "sto6g" | "sto-6g" => Ok(Driver::Sto6g),
            _ => Err(ChemError::UnknownDriver(s.to_string())),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ChemError {
    #[error("unknown driver '{0}' (expected sto3g or sto6g)")]
    UnknownDriver(String),
    #[error("bond distance {distance} Å outside the tabulated range {min}..{max} Å")]
    DistanceOutOfRange { distance: f64, min: f64, max: f64 },
}

/// Jordan-Wigner coefficients of the 4-qubit H2 Hamiltonian at one bond
/// distance. Qubits 0/1 are the occupied spin orbitals, 2/3 the virtuals.
#[derive(Debug, Clone, Copy)]
struct CoefficientRow {
    distance: f64,
    identity: f64,
    z_occ: f64,
    z_virt: f64,
    zz_occ: f64,
    zz_same_spin: f64,
    zz_cross_spin: f64,
    zz_virt: f64,
    exchange: f64,
}

impl CoefficientRow {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        let mix = |x: f64, y: f64| x + (y - x) * t;
        Self {
            distance: mix(a.distance, b.distance),
            identity: mix(a.identity, b.identity),
            z_occ: mix(a.z_occ, b.z_occ),
            z_virt: mix(a.z_virt, b.z_virt),
            zz_occ: mix(a.zz_occ, b.zz_occ),
            zz_same_spin: mix(a.zz_same_spin, b.zz_same_spin),
            zz_cross_spin: mix(a.zz_cross_spin, b.zz_cross_spin),
            zz_virt: mix(a.zz_virt, b.zz_virt),
            exchange: mix(a.exchange, b.exchange),
        }
    }
}

macro_rules! row {
    ($d:expr, $id:expr, $zo:expr, $zv:expr, $zzo:expr, $zzs:expr, $zzc:expr, $zzv:expr, $x:expr) => {
        CoefficientRow {
            distance: $d,
            identity: $id,
            z_occ: $zo,
            z_virt: $zv,
            zz_occ: $zzo,
            zz_same_spin: $zzs,
            zz_cross_spin: $zzc,
            zz_virt: $zzv,
            exchange: $x,
        }
    };
}

/// Minimal-basis table; the 0.735 Å row is the equilibrium reference set.
const STO3G: &[CoefficientRow] = &[
    row!(0.30, -1.1950, 0.3593, -0.4343, 0.1412, 0.1804, 0.1226, 0.1902, 0.0301),
    row!(0.50, -0.9803, 0.2582, -0.3188, 0.1308, 0.1746, 0.1217, 0.1822, 0.0374),
    row!(0.735, -0.8105, 0.1721, -0.2234, 0.1209, 0.1686, 0.1205, 0.1744, 0.0453),
    row!(0.90, -0.7235, 0.1252, -0.1716, 0.1153, 0.1650, 0.1196, 0.1701, 0.0512),
    row!(1.10, -0.6412, 0.0815, -0.1222, 0.1098, 0.1613, 0.1184, 0.1659, 0.0589),
    row!(1.50, -0.5322, 0.0276, -0.0594, 0.1012, 0.1552, 0.1155, 0.1595, 0.0749),
    row!(2.10, -0.4525, 0.0023, -0.0192, 0.0935, 0.1493, 0.1112, 0.1538, 0.0941),
];

/// Tighter contraction of the same basis; integrals shift at the per-mille
/// level relative to [`STO3G`].
const STO6G: &[CoefficientRow] = &[
    row!(0.30, -1.1982, 0.3611, -0.4361, 0.1415, 0.1807, 0.1228, 0.1906, 0.0303),
    row!(0.50, -0.9831, 0.2596, -0.3202, 0.1311, 0.1749, 0.1219, 0.1826, 0.0376),
    row!(0.735, -0.8129, 0.1731, -0.2246, 0.1212, 0.1689, 0.1207, 0.1748, 0.0455),
    row!(0.90, -0.7257, 0.1259, -0.1726, 0.1156, 0.1653, 0.1198, 0.1705, 0.0514),
    row!(1.10, -0.6431, 0.0820, -0.1229, 0.1101, 0.1616, 0.1186, 0.1663, 0.0592),
    row!(1.50, -0.5338, 0.0278, -0.0598, 0.1015, 0.1555, 0.1157, 0.1599, 0.0752),
    row!(2.10, -0.4539, 0.0023, -0.0194, 0.0938, 0.1496, 0.1114, 0.1542, 0.0945),
];

fn interpolate(table: &[CoefficientRow], distance: f64) -> Result<CoefficientRow, ChemError> {
    let min = table.first().map(|r| r.distance).unwrap_or(0.0);
    let max = table.last().map(|r| r.distance).unwrap_or(0.0);
    if !(min..=max).contains(&distance) {
        return Err(ChemError::DistanceOutOfRange { distance, min, max });
    }
    let upper = table
        .iter()
        .position(|r| r.distance >= distance)
        .expect("distance is within the table range");
    if table[upper].distance == distance || upper == 0 {
        return Ok(table[upper]);
    }
    let a = &table[upper - 1];
    let b = &table[upper];
    let t = (distance - a.distance) / (b.distance - a.distance);
    Ok(CoefficientRow::lerp(a, b, t))
}

/// Builds the 4-qubit Jordan-Wigner Hamiltonian of H2 at a bond distance in
/// Ångström, plus the nuclear-repulsion shift in Hartree.
///
/// The shift is the constant added to electronic eigenvalues to obtain total
/// molecular energies; it is returned separately and never folded into the
/// operator.
pub fn h2_hamiltonian(distance: f64, driver: Driver) -> Result<(PauliOperator, f64), ChemError> {
    let table = match driver {
        Driver::Sto3g => STO3G,
        Driver::Sto6g => STO6G,
    };
    let c = interpolate(table, distance)?;

    use Pauli::{X, Y};
    let exchange_terms = [
        (c.exchange, [X, X, Y, Y]),
        (c.exchange, [Y, Y, X, X]),
        (-c.exchange, [X, Y, Y, X]),
        (-c.exchange, [Y, X, X, Y]),
    ];

    let mut op = PauliOperator::new(vec![
        PauliTerm::identity(c.identity),
        PauliTerm::z(c.z_occ, 0),
        PauliTerm::z(c.z_occ, 1),
        PauliTerm::z(c.z_virt, 2),
        PauliTerm::z(c.z_virt, 3),
        PauliTerm::zz(c.zz_occ, 0, 1),
        PauliTerm::zz(c.zz_same_spin, 0, 2),
        PauliTerm::zz(c.zz_cross_spin, 0, 3),
        PauliTerm::zz(c.zz_cross_spin, 1, 2),
        PauliTerm::zz(c.zz_same_spin, 1, 3),
        PauliTerm::zz(c.zz_virt, 2, 3),
    ]);
    for (coefficient, paulis) in exchange_terms {
        op = op.with_term(PauliTerm::new(
            coefficient,
            paulis.into_iter().enumerate().collect(),
        ));
    }

    let shift = BOHR_RADIUS_ANGSTROM / distance;
    Ok((op, shift))
}
