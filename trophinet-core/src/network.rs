//! Builds the trophic edge list from the iteration's secretion tables and the
//! final medium.

use crate::{
    error::TrophicError,
    medium::Medium,
    model::{MetabolicModel, ModelSource},
    secretion::SecretionTable,
};
use log::{debug, info, warn};
use std::{
    collections::{BTreeMap, BTreeSet},
    fs,
    path::Path,
};
use trophinet_schemas::network::{EdgeKind, EdgeRecord, SkippedModelRecord};

/// Model id -> compounds it was seen secreting.
pub type SecretorMap = BTreeMap<String, BTreeSet<String>>;

/// Reads every secretion table in `dir`, ordered by file name. Hidden files are ignored.
pub fn read_secretion_tables<P: AsRef<Path>>(dir: P) -> Result<Vec<SecretionTable>, TrophicError> {
    let dir = dir.as_ref();
    let dir_str = dir.display().to_string();
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| TrophicError::FileIO(dir_str.clone(), e))? {
        let path = entry
            .map_err(|e| TrophicError::FileIO(dir_str.clone(), e))?
            .path();
        let hidden = path
            .file_name()
            .and_then(|n| n.to_str())
            .map_or(true, |n| n.starts_with('.'));
        if path.is_file() && !hidden {
            paths.push(path);
        }
    }
    paths.sort();
    paths.iter().map(SecretionTable::read_csv).collect()
}

/// Unions the net secretions of every table per model.
///
/// A model that appears as a column but never with a negative flux is kept with
/// an empty set, so its uptakes are still derived.
pub fn aggregate_secretions(tables: &[SecretionTable]) -> SecretorMap {
    let mut secretors = SecretorMap::new();
    for table in tables {
        for (model, compounds) in table.net_secretions() {
            secretors.entry(model).or_default().extend(compounds);
        }
    }
    secretors
}

/// Keeps only organic compounds. Models left with nothing are dropped.
pub fn filter_organic(secretors: &SecretorMap, organic: &BTreeSet<String>) -> SecretorMap {
    secretors
        .iter()
        .filter_map(|(model, compounds)| {
            let kept: BTreeSet<String> = compounds.intersection(organic).cloned().collect();
            if kept.is_empty() {
                debug!("Model '{}' secretes no organic compound", model);
                None
            } else {
                Some((model.clone(), kept))
            }
        })
        .collect()
}

/// model -> compound edges.
pub fn secretion_edges(secretors: &SecretorMap) -> Vec<EdgeRecord> {
    secretors
        .iter()
        .flat_map(|(model, compounds)| {
            compounds.iter().map(move |compound| EdgeRecord {
                from: model.clone(),
                to: compound.clone(),
                kind: Some(EdgeKind::Secretion),
            })
        })
        .collect()
}

/// compound -> model edges for every final-medium compound a model can take up.
#[derive(Debug, Clone, Default)]
pub struct UptakeDerivation {
    pub edges: Vec<EdgeRecord>,
    pub skipped: Vec<SkippedModelRecord>,
}

/// Reloads each model and intersects its exchanges with `final_medium`.
///
/// A model that cannot be loaded is recorded in `skipped` and left out; the
/// rest of the network is still built.
pub fn uptake_edges<'a, S, I>(source: &S, model_ids: I, final_medium: &Medium) -> UptakeDerivation
where
    S: ModelSource,
    I: IntoIterator<Item = &'a str>,
{
    let mut derivation = UptakeDerivation::default();
    for model_id in model_ids {
        let model = match source.load(model_id) {
            Ok(model) => model,
            Err(e) => {
                warn!("Skipping uptakes of model '{}': {}", model_id, e);
                derivation.skipped.push(SkippedModelRecord {
                    gsmm: model_id.to_string(),
                    reason: e.to_string(),
                });
                continue;
            }
        };
        let exchanges = model.exchange_ids();
        derivation.edges.extend(
            final_medium
                .compounds()
                .filter(|c| exchanges.contains(*c))
                .map(|c| EdgeRecord {
                    from: c.to_string(),
                    to: model_id.to_string(),
                    kind: Some(EdgeKind::Uptake),
                }),
        );
    }
    derivation
}

/// The directed trophic network: uptake edges followed by secretion edges.
#[derive(Debug, Clone, Default)]
pub struct TrophicNetwork {
    pub edges: Vec<EdgeRecord>,
    pub skipped: Vec<SkippedModelRecord>,
}

impl TrophicNetwork {
    pub fn uptakes(&self) -> impl Iterator<Item = &EdgeRecord> {
        self.edges
            .iter()
            .filter(|e| e.kind == Some(EdgeKind::Uptake))
    }

    pub fn secretions(&self) -> impl Iterator<Item = &EdgeRecord> {
        self.edges
            .iter()
            .filter(|e| e.kind == Some(EdgeKind::Secretion))
    }
}

/// Aggregates `tables`, filters to `organic` compounds, and derives uptakes of
/// every secreting model against `final_medium`.
pub fn build_network<S: ModelSource>(
    source: &S,
    tables: &[SecretionTable],
    organic: &BTreeSet<String>,
    final_medium: &Medium,
) -> TrophicNetwork {
    let secretors = aggregate_secretions(tables);
    let organic_secretors = filter_organic(&secretors, organic);

    let uptakes = uptake_edges(source, secretors.keys().map(String::as_str), final_medium);
    let secretions = secretion_edges(&organic_secretors);
    info!(
        "Network: {} secreting models, {} uptake edges, {} secretion edges, {} models skipped",
        secretors.len(),
        uptakes.edges.len(),
        secretions.len(),
        uptakes.skipped.len()
    );

    let mut edges = uptakes.edges;
    edges.extend(secretions);
    TrophicNetwork {
        edges,
        skipped: uptakes.skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FluxRange, SecretionProfile};

    fn table(columns: &[(&str, &[(&str, f64)])]) -> SecretionTable {
        let mut table = SecretionTable::new();
        for (model, entries) in columns {
            let profile: SecretionProfile = entries
                .iter()
                .map(|(c, lower)| (c.to_string(), FluxRange { lower: *lower, upper: 0.0 }))
                .collect();
            table.add_profile(model, &profile);
        }
        table
    }

    fn set(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn aggregation_unions_and_deduplicates_across_rounds() {
        let tables = vec![
            table(&[("G001", &[("EX_ac", -1.0)])]),
            table(&[("G001", &[("EX_ac", -2.0), ("EX_for", -0.1)]), ("G002", &[("EX_lac", -3.0)])]),
        ];

        let first = aggregate_secretions(&tables);
        assert_eq!(first["G001"], set(&["EX_ac", "EX_for"]));
        assert_eq!(first["G002"], set(&["EX_lac"]));
        assert_eq!(aggregate_secretions(&tables), first);
    }

    #[test]
    fn organic_filter_drops_models_with_nothing_left() {
        let tables = vec![table(&[
            ("G001", &[("EX_ac", -1.0), ("EX_nh4", -1.0)]),
            ("G002", &[("EX_h2s", -1.0)]),
        ])];
        let filtered = filter_organic(&aggregate_secretions(&tables), &set(&["EX_ac"]));

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered["G001"], set(&["EX_ac"]));
    }

    #[test]
    fn secretion_edges_point_from_model_to_compound() {
        let mut secretors = SecretorMap::new();
        secretors.insert("G001".to_string(), set(&["EX_ac"]));
        let edges = secretion_edges(&secretors);

        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].from, "G001");
        assert_eq!(edges[0].to, "EX_ac");
        assert_eq!(edges[0].kind, Some(EdgeKind::Secretion));
    }
}
