//! The nutrient medium offered to models in a growth round.

use std::collections::{BTreeMap, BTreeSet};
use trophinet_schemas::medium::MediumEntry;

/// Upper uptake bound meaning "freely available".
pub const UNCONSTRAINED_FLUX: f64 = 1000.0;

/// A mapping from exchange reaction id to its uptake bound.
///
/// Media are values: every operation returns a new `Medium` and leaves the
/// receiver untouched, so a round can never alias the medium of another.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Medium {
    entries: BTreeMap<String, f64>,
}

impl Medium {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a medium where every compound is freely available.
    pub fn from_compounds<I, S>(compounds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        compounds
            .into_iter()
            .map(|c| (c.into(), UNCONSTRAINED_FLUX))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, exchange: &str) -> bool {
        self.entries.contains_key(exchange)
    }

    pub fn flux(&self, exchange: &str) -> Option<f64> {
        self.entries.get(exchange).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn compounds(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// The part of this medium a model can take up: entries whose exchange the
    /// model holds, each opened to `UNCONSTRAINED_FLUX`.
    ///
    /// An empty result is valid; the model simply has nothing to grow on.
    pub fn restrict_to(&self, exchanges: &BTreeSet<String>) -> Medium {
        self.entries
            .keys()
            .filter(|k| exchanges.contains(*k))
            .map(|k| (k.clone(), UNCONSTRAINED_FLUX))
            .collect()
    }

    /// Adds the given compounds at `UNCONSTRAINED_FLUX`. Entries already present keep their bound.
    pub fn with_compounds<I, S>(&self, compounds: I) -> Medium
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut entries = self.entries.clone();
        for compound in compounds {
            entries.entry(compound.into()).or_insert(UNCONSTRAINED_FLUX);
        }
        Medium { entries }
    }

    /// Union of both media. On shared keys the receiver's bound wins.
    pub fn merged_with(&self, other: &Medium) -> Medium {
        let mut entries = other.entries.clone();
        entries.extend(self.entries.iter().map(|(k, v)| (k.clone(), *v)));
        Medium { entries }
    }

    /// True when both media offer the same compounds, regardless of bounds.
    pub fn same_compounds(&self, other: &Medium) -> bool {
        self.entries.len() == other.entries.len()
            && self.entries.keys().zip(other.entries.keys()).all(|(a, b)| a == b)
    }

    pub fn is_subset_of(&self, other: &Medium) -> bool {
        self.entries.keys().all(|k| other.entries.contains_key(k))
    }

    pub fn to_entries(&self) -> Vec<MediumEntry> {
        self.entries
            .iter()
            .map(|(exchange, flux)| MediumEntry {
                exchange: exchange.clone(),
                flux: *flux,
            })
            .collect()
    }
}

impl FromIterator<(String, f64)> for Medium {
    fn from_iter<T: IntoIterator<Item = (String, f64)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<MediumEntry>> for Medium {
    fn from(entries: Vec<MediumEntry>) -> Self {
        entries.into_iter().map(|e| (e.exchange, e.flux)).collect()
    }
}
