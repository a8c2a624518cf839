//! Per-round secretion tables: compounds as rows, secreting models as columns.

use crate::{error::TrophicError, model::SecretionProfile};
use std::{
    collections::{BTreeMap, BTreeSet},
    path::Path,
};

/// Compound x model matrix of secretion fluxes for one round.
///
/// Cells are sparse: a model that does not secrete a compound simply has no
/// value for it, and is written as an empty cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SecretionTable {
    models: Vec<String>,
    columns: BTreeMap<String, BTreeMap<String, f64>>,
}

impl SecretionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a model's column. Empty profiles are dropped; returns whether a column was added.
    pub fn add_profile(&mut self, model_id: &str, profile: &SecretionProfile) -> bool {
        if profile.is_empty() {
            return false;
        }
        let column = profile
            .iter()
            .map(|(exchange, range)| (exchange.clone(), range.lower))
            .collect();
        if self.columns.insert(model_id.to_string(), column).is_none() {
            self.models.push(model_id.to_string());
        }
        true
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Column ids in insertion order.
    pub fn models(&self) -> &[String] {
        &self.models
    }

    /// The row index: every compound secreted by at least one model.
    pub fn compounds(&self) -> BTreeSet<String> {
        self.columns
            .values()
            .flat_map(|column| column.keys().cloned())
            .collect()
    }

    pub fn value(&self, compound: &str, model_id: &str) -> Option<f64> {
        self.columns.get(model_id)?.get(compound).copied()
    }

    /// For every column, the compounds with a strictly negative flux (net secretion).
    /// Models whose column holds no such value are still listed, with an empty set.
    pub fn net_secretions(&self) -> BTreeMap<String, BTreeSet<String>> {
        self.models
            .iter()
            .map(|model| {
                let secreted = self.columns[model]
                    .iter()
                    .filter(|(_, flux)| **flux < 0.0)
                    .map(|(compound, _)| compound.clone())
                    .collect();
                (model.clone(), secreted)
            })
            .collect()
    }

    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), TrophicError> {
        let path = path.as_ref();
        let csv_err = |e: csv::Error| TrophicError::CsvError(path.display().to_string(), e);
        let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;

        let mut header = vec![String::new()];
        header.extend(self.models.iter().cloned());
        writer.write_record(&header).map_err(csv_err)?;

        for compound in self.compounds() {
            let mut row = vec![compound.clone()];
            row.extend(self.models.iter().map(|model| {
                self.value(&compound, model)
                    .map(|v| v.to_string())
                    .unwrap_or_default()
            }));
            writer.write_record(&row).map_err(csv_err)?;
        }
        writer
            .flush()
            .map_err(|e| TrophicError::FileIO(path.display().to_string(), e))?;
        Ok(())
    }

    /// Reads a table written by `write_csv`. Empty and `NaN` cells are treated as missing.
    pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Self, TrophicError> {
        let path = path.as_ref();
        let path_str = path.display().to_string();
        let mut reader = csv::Reader::from_path(path)
            .map_err(|e| TrophicError::CsvError(path_str.clone(), e))?;

        let models: Vec<String> = reader
            .headers()
            .map_err(|e| TrophicError::CsvError(path_str.clone(), e))?
            .iter()
            .skip(1)
            .map(str::to_string)
            .collect();
        let mut columns: BTreeMap<String, BTreeMap<String, f64>> = models
            .iter()
            .map(|m| (m.clone(), BTreeMap::new()))
            .collect();

        for (row, result) in reader.records().enumerate() {
            let record = result.map_err(|e| TrophicError::CsvError(path_str.clone(), e))?;
            let Some(compound) = record.get(0) else {
                continue;
            };
            for (col, (model, cell)) in models.iter().zip(record.iter().skip(1)).enumerate() {
                let cell = cell.trim();
                if cell.is_empty() || cell.eq_ignore_ascii_case("nan") {
                    continue;
                }
                let flux: f64 = cell.parse().map_err(|_| TrophicError::InvalidValue {
                    path: path_str.clone(),
                    value: cell.to_string(),
                    row: row + 1,
                    col: col + 1,
                })?;
                if let Some(column) = columns.get_mut(model) {
                    column.insert(compound.to_string(), flux);
                }
            }
        }

        Ok(Self { models, columns })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FluxRange;

    fn profile(entries: &[(&str, f64)]) -> SecretionProfile {
        entries
            .iter()
            .map(|(ex, lower)| {
                (
                    ex.to_string(),
                    FluxRange {
                        lower: *lower,
                        upper: 0.0,
                    },
                )
            })
            .collect()
    }

    #[test]
    fn empty_profiles_do_not_become_columns() {
        let mut table = SecretionTable::new();
        assert!(!table.add_profile("G001", &profile(&[])));
        assert!(table.add_profile("G002", &profile(&[("EX_ac", -2.0)])));

        assert_eq!(table.models(), ["G002".to_string()]);
        assert_eq!(table.compounds().len(), 1);
    }

    #[test]
    fn csv_roundtrip_keeps_sparse_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secretion_1.csv");
        let mut table = SecretionTable::new();
        table.add_profile("G001", &profile(&[("EX_ac", -2.5), ("EX_for", -0.5)]));
        table.add_profile("G002", &profile(&[("EX_lac", -1.0)]));

        table.write_csv(&path).unwrap();
        let read = SecretionTable::read_csv(&path).unwrap();

        assert_eq!(read, table);
        assert_eq!(read.value("EX_lac", "G001"), None);
        assert_eq!(read.value("EX_ac", "G001"), Some(-2.5));
    }

    #[test]
    fn net_secretions_skip_non_negative_and_nan_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secretion_2.csv");
        std::fs::write(&path, ",G001,G002\nEX_ac,-1.0,NaN\nEX_h2o,0.0,\n").unwrap();

        let net = SecretionTable::read_csv(&path).unwrap().net_secretions();
        assert_eq!(net["G001"].len(), 1);
        assert!(net["G002"].is_empty());
    }

    #[test]
    fn unparsable_cells_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secretion_3.csv");
        std::fs::write(&path, ",G001\nEX_ac,lots\n").unwrap();

        assert!(matches!(
            SecretionTable::read_csv(&path),
            Err(TrophicError::InvalidValue { row: 1, col: 1, .. })
        ));
    }
}
