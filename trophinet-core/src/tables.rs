//! CSV helpers for the pipeline's tabular inputs and artifacts.

use crate::{error::TrophicError, medium::Medium};
use serde::{de::DeserializeOwned, Serialize};
use std::{collections::BTreeSet, path::Path};
use trophinet_schemas::{
    medium::MediumEntry,
    reference::{ExudateRecord, OrganicCompound},
};

fn display(path: &Path) -> String {
    path.display().to_string()
}

/// Reads every row of a headed CSV file into `T`. Columns are matched by header name,
/// so unnamed index columns written by other tools are ignored.
pub fn read_records<T, P>(path: P) -> Result<Vec<T>, TrophicError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let mut reader =
        csv::Reader::from_path(path).map_err(|e| TrophicError::CsvError(display(path), e))?;
    reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(|e| TrophicError::CsvError(display(path), e))
}

pub fn write_records<T, P>(path: P, records: &[T]) -> Result<(), TrophicError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let mut writer =
        csv::Writer::from_path(path).map_err(|e| TrophicError::CsvError(display(path), e))?;
    for record in records {
        writer
            .serialize(record)
            .map_err(|e| TrophicError::CsvError(display(path), e))?;
    }
    writer
        .flush()
        .map_err(|e| TrophicError::FileIO(display(path), e))?;
    Ok(())
}

/// Like `write_records`, but an empty table still gets its header row.
pub fn write_table<T, P>(path: P, header: &[&str], records: &[T]) -> Result<(), TrophicError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    if !records.is_empty() {
        return write_records(path, records);
    }
    let path = path.as_ref();
    let mut writer =
        csv::Writer::from_path(path).map_err(|e| TrophicError::CsvError(display(path), e))?;
    writer
        .write_record(header)
        .map_err(|e| TrophicError::CsvError(display(path), e))?;
    writer
        .flush()
        .map_err(|e| TrophicError::FileIO(display(path), e))?;
    Ok(())
}

pub fn read_medium<P: AsRef<Path>>(path: P) -> Result<Medium, TrophicError> {
    read_records::<MediumEntry, _>(path).map(Medium::from)
}

pub fn write_medium<P: AsRef<Path>>(path: P, medium: &Medium) -> Result<(), TrophicError> {
    write_table(path, MediumEntry::HEADER, &medium.to_entries())
}

/// The set of compound ids considered organic.
pub fn read_organic_compounds<P: AsRef<Path>>(path: P) -> Result<BTreeSet<String>, TrophicError> {
    Ok(read_records::<OrganicCompound, _>(path)?
        .into_iter()
        .map(|c| c.compound)
        .collect())
}

/// Exudate ids in file order, without duplicates.
pub fn read_exudates<P: AsRef<Path>>(path: P) -> Result<Vec<String>, TrophicError> {
    let mut seen = BTreeSet::new();
    Ok(read_records::<ExudateRecord, _>(path)?
        .into_iter()
        .map(|r| r.metabolite)
        .filter(|m| seen.insert(m.clone()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn medium_roundtrips_through_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("medium_1.csv");
        let medium = Medium::from_compounds(["EX_glc", "EX_ac"]);

        write_medium(&path, &medium).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("exchange,flux"));
        assert_eq!(read_medium(&path).unwrap(), medium);
    }

    #[test]
    fn medium_reader_ignores_index_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("medium_0.csv");
        fs::write(&path, ",exchange,flux\n0,EX_glc,1000\n1,EX_nh4,1000\n").unwrap();

        let medium = read_medium(&path).unwrap();
        assert_eq!(medium.len(), 2);
        assert!(medium.contains("EX_nh4"));
    }

    #[test]
    fn empty_tables_keep_their_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("medium_3.csv");

        write_medium(&path, &Medium::new()).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "exchange,flux\n");
        assert!(read_medium(&path).unwrap().is_empty());
    }

    #[test]
    fn exudates_are_deduplicated_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exudates.csv");
        fs::write(&path, "metabolite\nEX_cit\nEX_mal\nEX_cit\n").unwrap();

        assert_eq!(read_exudates(&path).unwrap(), vec!["EX_cit", "EX_mal"]);
    }

    #[test]
    fn missing_file_is_reported_with_its_path() {
        let err = read_medium("/nonexistent/medium.csv").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/medium.csv"));
    }
}
