//! Loading precomputed sweep results from comma-delimited text files.
//!
//! A scenario `n` lives in three files under one directory:
//! `alpha_list{n}.csv` (the risk weights, one row or one column),
//! `energy_matrix{n}.csv` and `std_matrix{n}.csv` (rows = risk weights,
//! columns = repetitions).

use nalgebra::DMatrix;
use std::fs;
use std::path::Path;

use crate::Error;
use crate::experiment::RiskSweep;

/// A risk-weight sweep restored from disk.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub alphas: Vec<f64>,
    pub energy: DMatrix<f64>,
    pub std: DMatrix<f64>,
}

impl Scenario {
    /// Reads scenario `index` from `dir`, validating that the two matrices
    /// share their shape and have one row per risk weight.
    pub fn load(dir: &Path, index: usize) -> Result<Self, Error> {
        let alphas = read_vector(&dir.join(format!("alpha_list{index}.csv")))?;
        let energy = read_matrix(&dir.join(format!("energy_matrix{index}.csv")))?;
        let std = read_matrix(&dir.join(format!("std_matrix{index}.csv")))?;

        if energy.nrows() != alphas.len() {
            return Err(Error::ScenarioShape {
                rows: energy.nrows(),
                alphas: alphas.len(),
            });
        }
        if std.shape() != energy.shape() {
            return Err(Error::ScenarioShape {
                rows: std.nrows(),
                alphas: alphas.len(),
            });
        }

        Ok(Self {
            alphas,
            energy,
            std,
        })
    }

    /// Turns the loaded matrices into the shape the plotting layer consumes.
    /// The shift is supplied by the caller since the files store raw
    /// electronic energies.
    pub fn into_risk_sweep(self, form: crate::VariationalForm, shift: f64) -> RiskSweep {
        RiskSweep {
            alphas: self.alphas,
            form,
            shift,
            energy: self.energy,
            std: self.std,
        }
    }
}

fn parse_row(path: &Path, line_no: usize, line: &str) -> Result<Vec<f64>, Error> {
    line.split(',')
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .map(|field| {
            field.parse::<f64>().map_err(|e| Error::Scenario {
                path: path.to_path_buf(),
                reason: format!("line {}: {e}: {field:?}", line_no + 1),
            })
        })
        .collect()
}

fn read_rows(path: &Path) -> Result<Vec<Vec<f64>>, Error> {
    let text = fs::read_to_string(path).map_err(|e| Error::Scenario {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let mut rows = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        rows.push(parse_row(path, line_no, line)?);
    }
    if rows.is_empty() {
        return Err(Error::Scenario {
            path: path.to_path_buf(),
            reason: "file holds no numeric rows".into(),
        });
    }
    Ok(rows)
}

/// Reads a vector stored either as a single row or a single column.
fn read_vector(path: &Path) -> Result<Vec<f64>, Error> {
    let rows = read_rows(path)?;
    if rows.len() == 1 {
        return Ok(rows.into_iter().next().unwrap_or_default());
    }
    let mut values = Vec::with_capacity(rows.len());
    for row in &rows {
        if row.len() != 1 {
            return Err(Error::Scenario {
                path: path.to_path_buf(),
                reason: format!("expected one row or one column, got {} columns", row.len()),
            });
        }
        values.push(row[0]);
    }
    Ok(values)
}

fn read_matrix(path: &Path) -> Result<DMatrix<f64>, Error> {
    let rows = read_rows(path)?;
    let ncols = rows[0].len();
    for (line_no, row) in rows.iter().enumerate() {
        if row.len() != ncols {
            return Err(Error::Scenario {
                path: path.to_path_buf(),
                reason: format!(
                    "row {} has {} columns, expected {ncols}",
                    line_no + 1,
                    row.len()
                ),
            });
        }
    }
    Ok(DMatrix::from_row_iterator(
        rows.len(),
        ncols,
        rows.into_iter().flatten(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("vvqe-data-{name}-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write(dir: &Path, name: &str, body: &str) {
        fs::write(dir.join(name), body).unwrap();
    }

    #[test]
    fn loads_a_scenario_with_a_row_alpha_vector() {
        let dir = temp_dir("row");
        write(&dir, "alpha_list1.csv", "0.0,0.5,1.0\n");
        write(&dir, "energy_matrix1.csv", "-1.0,-1.1\n-0.9,-1.0\n-0.8,-0.9\n");
        write(&dir, "std_matrix1.csv", "0.1,0.2\n0.1,0.2\n0.1,0.2\n");

        let scenario = Scenario::load(&dir, 1).unwrap();
        assert_eq!(scenario.alphas, vec![0.0, 0.5, 1.0]);
        assert_eq!(scenario.energy.shape(), (3, 2));
        assert!((scenario.energy[(1, 0)] + 0.9).abs() < 1e-12);
        assert!((scenario.std[(2, 1)] - 0.2).abs() < 1e-12);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn loads_a_scenario_with_a_column_alpha_vector() {
        let dir = temp_dir("col");
        write(&dir, "alpha_list2.csv", "0.1\n0.9\n");
        write(&dir, "energy_matrix2.csv", "-1.0\n-0.5\n");
        write(&dir, "std_matrix2.csv", "0.3\n0.4\n");

        let scenario = Scenario::load(&dir, 2).unwrap();
        assert_eq!(scenario.alphas, vec![0.1, 0.9]);
        assert_eq!(scenario.energy.shape(), (2, 1));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn rejects_a_matrix_with_the_wrong_row_count() {
        let dir = temp_dir("shape");
        write(&dir, "alpha_list3.csv", "0.0,1.0\n");
        write(&dir, "energy_matrix3.csv", "-1.0\n-0.9\n-0.8\n");
        write(&dir, "std_matrix3.csv", "0.1\n0.1\n0.1\n");

        assert!(matches!(
            Scenario::load(&dir, 3),
            Err(Error::ScenarioShape { rows: 3, alphas: 2 })
        ));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn rejects_a_ragged_matrix() {
        let dir = temp_dir("ragged");
        write(&dir, "alpha_list4.csv", "0.0\n");
        write(&dir, "energy_matrix4.csv", "-1.0,-1.1\n-0.9\n");
        write(&dir, "std_matrix4.csv", "0.1,0.1\n");

        let err = Scenario::load(&dir, 4).unwrap_err();
        assert!(matches!(err, Error::Scenario { .. }), "{err}");
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn surfaces_non_numeric_fields_with_their_location() {
        let dir = temp_dir("parse");
        write(&dir, "alpha_list5.csv", "0.0,oops\n");
        write(&dir, "energy_matrix5.csv", "-1.0\n");
        write(&dir, "std_matrix5.csv", "0.1\n");

        let err = Scenario::load(&dir, 5).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("oops"), "{message}");
        fs::remove_dir_all(&dir).unwrap();
    }
}
