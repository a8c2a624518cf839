use super::graph::TrophicGraph;
use crate::error::TrophicError;
use log::{debug, info, warn};
use std::{
    fs,
    io::{BufWriter, Write},
    path::Path,
};
use trophinet_schemas::{file_formats::PathSnapshotFile, path::PathNode};

/// Shortest paths shorter than this many nodes are never kept.
pub const MIN_PATH_NODES: usize = 3;

/// Every retained shortest path rooted at one exudate.
#[derive(Debug, Clone, PartialEq)]
pub struct ExudatePaths {
    pub exudate: String,
    pub paths: Vec<Vec<PathNode>>,
}

impl ExudatePaths {
    pub fn with_length(&self, nodes: usize) -> impl Iterator<Item = &[PathNode]> {
        self.paths
            .iter()
            .filter(move |p| p.len() == nodes)
            .map(Vec::as_slice)
    }

    /// Writes the snapshot as a single column named after the exudate.
    pub fn write_snapshot<P: AsRef<Path>>(&self, path: P) -> Result<(), TrophicError> {
        let path = path.as_ref();
        let mut columns = PathSnapshotFile::new();
        columns.insert(self.exudate.clone(), self.paths.clone());
        let io_err = |e: std::io::Error| TrophicError::FileIO(path.display().to_string(), e);
        let mut writer = BufWriter::new(fs::File::create(path).map_err(io_err)?);
        serde_json::to_writer(&mut writer, &columns)?;
        writer.flush().map_err(io_err)
    }

    /// Reads the column for `exudate` from a snapshot file.
    pub fn read_snapshot<P: AsRef<Path>>(path: P, exudate: &str) -> Result<Self, TrophicError> {
        let path = path.as_ref();
        let path_str = path.display().to_string();
        let content = fs::read_to_string(path).map_err(|e| TrophicError::FileIO(path_str.clone(), e))?;
        let mut columns: PathSnapshotFile = serde_json::from_str(&content)?;
        let paths = columns.remove(exudate).ok_or_else(|| {
            TrophicError::ConfigError(format!(
                "snapshot '{}' has no column for exudate '{}'",
                path_str, exudate
            ))
        })?;
        Ok(Self {
            exudate: exudate.to_string(),
            paths,
        })
    }
}

/// Enumerates all shortest paths from `exudate` to every other node and keeps
/// those with at least `MIN_PATH_NODES` nodes.
///
/// An exudate missing from the graph, or one that reaches nothing, yields no paths.
pub fn enumerate_exudate_paths(graph: &TrophicGraph, exudate: &str) -> ExudatePaths {
    let mut paths = Vec::new();
    match graph.shortest_paths_from(exudate) {
        None => warn!("Exudate '{}' is not part of the network", exudate),
        Some(search) => {
            for end in graph.nodes().filter(|n| n.id != exudate) {
                let found = search.paths_to(&end.id);
                if found.is_empty() {
                    debug!("No path from '{}' to '{}'", exudate, end.id);
                    continue;
                }
                paths.extend(found.into_iter().filter(|p| p.len() >= MIN_PATH_NODES));
            }
        }
    }
    info!("Exudate '{}': {} paths retained", exudate, paths.len());
    ExudatePaths {
        exudate: exudate.to_string(),
        paths,
    }
}
