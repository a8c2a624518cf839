//! On-disk layout of a pipeline run.
//!
//! ```text
//! <root>/media/medium_<n>.csv
//! <root>/growths/growths_<n>.csv
//! <root>/secretions/secretion_<n>.csv
//! <root>/outcomes/outcomes_<n>.csv
//! <root>/network/network_edges.csv
//! <root>/network/skipped_models.csv
//! <root>/paths/snapshots/<exudate>.json
//! <root>/paths/PM_edge_courses_df.csv
//! <root>/paths/PMM_edge_courses_df.csv
//! <root>/paths/classification_summary.csv
//! ```

use crate::{error::TrophicError, iteration::state::RoundOutcome, tables};
use log::info;
use std::{
    fs,
    path::{Path, PathBuf},
};
use trophinet_schemas::growth::{GrowthRecord, OutcomeRecord};

#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// Opens the store, creating the root directory if needed.
    pub fn new<P: Into<PathBuf>>(root: P) -> Result<Self, TrophicError> {
        let root = root.into();
        ensure_dir(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn media_dir(&self) -> PathBuf {
        self.root.join("media")
    }

    pub fn growths_dir(&self) -> PathBuf {
        self.root.join("growths")
    }

    pub fn secretions_dir(&self) -> PathBuf {
        self.root.join("secretions")
    }

    pub fn outcomes_dir(&self) -> PathBuf {
        self.root.join("outcomes")
    }

    pub fn network_dir(&self) -> PathBuf {
        self.root.join("network")
    }

    pub fn paths_dir(&self) -> PathBuf {
        self.root.join("paths")
    }

    pub fn snapshots_dir(&self) -> PathBuf {
        self.paths_dir().join("snapshots")
    }

    pub fn medium_path(&self, round: usize) -> PathBuf {
        self.media_dir().join(format!("medium_{}.csv", round))
    }

    pub fn growth_path(&self, round: usize) -> PathBuf {
        self.growths_dir().join(format!("growths_{}.csv", round))
    }

    pub fn secretion_path(&self, round: usize) -> PathBuf {
        self.secretions_dir().join(format!("secretion_{}.csv", round))
    }

    pub fn outcome_path(&self, round: usize) -> PathBuf {
        self.outcomes_dir().join(format!("outcomes_{}.csv", round))
    }

    pub fn edges_path(&self) -> PathBuf {
        self.network_dir().join("network_edges.csv")
    }

    pub fn skipped_models_path(&self) -> PathBuf {
        self.network_dir().join("skipped_models.csv")
    }

    /// `%`, `/` and `\` are percent-escaped so every exudate id maps to its own file.
    pub fn snapshot_path(&self, exudate: &str) -> PathBuf {
        let mut file_name = String::with_capacity(exudate.len());
        for c in exudate.chars() {
            match c {
                '%' => file_name.push_str("%25"),
                '/' => file_name.push_str("%2F"),
                '\\' => file_name.push_str("%5C"),
                _ => file_name.push(c),
            }
        }
        self.snapshots_dir().join(format!("{}.json", file_name))
    }

    pub fn pm_path(&self) -> PathBuf {
        self.paths_dir().join("PM_edge_courses_df.csv")
    }

    pub fn pmm_path(&self) -> PathBuf {
        self.paths_dir().join("PMM_edge_courses_df.csv")
    }

    pub fn summary_path(&self) -> PathBuf {
        self.paths_dir().join("classification_summary.csv")
    }

    /// Removes every per-round table left by an earlier run into the same root.
    pub fn clear_rounds(&self) -> Result<(), TrophicError> {
        for dir in [
            self.media_dir(),
            self.growths_dir(),
            self.secretions_dir(),
            self.outcomes_dir(),
        ] {
            if dir.is_dir() {
                fs::remove_dir_all(&dir)
                    .map_err(|e| TrophicError::FileIO(dir.display().to_string(), e))?;
            }
        }
        Ok(())
    }

    /// Writes the medium, growth, secretion and outcome tables of one round.
    pub fn record_round(&self, outcome: &RoundOutcome) -> Result<(), TrophicError> {
        for dir in [
            self.media_dir(),
            self.growths_dir(),
            self.secretions_dir(),
            self.outcomes_dir(),
        ] {
            ensure_dir(&dir)?;
        }
        let round = outcome.round;
        tables::write_medium(self.medium_path(round), &outcome.next_medium)?;
        tables::write_table(self.growth_path(round), GrowthRecord::HEADER, &outcome.growths)?;
        outcome.secretions.write_csv(self.secretion_path(round))?;
        tables::write_table(
            self.outcome_path(round),
            OutcomeRecord::HEADER,
            &outcome.outcome_records(),
        )?;
        info!(
            "Round {} artifacts written to '{}'",
            round,
            self.root.display()
        );
        Ok(())
    }

    /// The highest-numbered `medium_<n>.csv`, if any round has been recorded.
    pub fn latest_medium_path(&self) -> Result<Option<PathBuf>, TrophicError> {
        let dir = self.media_dir();
        if !dir.is_dir() {
            return Ok(None);
        }
        let dir_str = dir.display().to_string();
        let mut latest: Option<(usize, PathBuf)> = None;
        for entry in fs::read_dir(&dir).map_err(|e| TrophicError::FileIO(dir_str.clone(), e))? {
            let path = entry
                .map_err(|e| TrophicError::FileIO(dir_str.clone(), e))?
                .path();
            let round = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.strip_prefix("medium_"))
                .and_then(|n| n.parse::<usize>().ok());
            if let Some(round) = round {
                if latest.as_ref().map_or(true, |(best, _)| round > *best) {
                    latest = Some((round, path));
                }
            }
        }
        Ok(latest.map(|(_, path)| path))
    }
}

pub fn ensure_dir(dir: &Path) -> Result<(), TrophicError> {
    fs::create_dir_all(dir).map_err(|e| TrophicError::FileIO(dir.display().to_string(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_medium_picks_highest_round_numerically() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path()).unwrap();
        assert_eq!(store.latest_medium_path().unwrap(), None);

        ensure_dir(&store.media_dir()).unwrap();
        for round in [2, 10, 9] {
            fs::write(store.medium_path(round), "exchange,flux\n").unwrap();
        }
        fs::write(store.media_dir().join("notes.csv"), "").unwrap();

        assert_eq!(store.latest_medium_path().unwrap(), Some(store.medium_path(10)));
    }

    #[test]
    fn snapshot_names_are_filesystem_safe() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path()).unwrap();
        let path = store.snapshot_path("cpd/00027");
        assert_eq!(path.file_name().unwrap(), "cpd%2F00027.json");
        assert_eq!(path.parent().unwrap(), store.snapshots_dir());
    }

    #[test]
    fn distinct_exudates_never_share_a_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path()).unwrap();
        let names = ["cpd/1", "cpd_1", "cpd%2F1", "cpd\\1"];
        let paths: std::collections::BTreeSet<PathBuf> =
            names.iter().map(|n| store.snapshot_path(n)).collect();
        assert_eq!(paths.len(), names.len());
    }

    #[test]
    fn clear_rounds_leaves_other_stages_alone() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path()).unwrap();
        ensure_dir(&store.media_dir()).unwrap();
        ensure_dir(&store.network_dir()).unwrap();
        fs::write(store.medium_path(7), "exchange,flux\n").unwrap();
        fs::write(store.edges_path(), "from,to,kind\n").unwrap();

        store.clear_rounds().unwrap();

        assert_eq!(store.latest_medium_path().unwrap(), None);
        assert!(store.edges_path().is_file());
        // clearing an already clean store is fine
        store.clear_rounds().unwrap();
    }
}
