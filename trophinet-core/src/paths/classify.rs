//! Differential-abundance classification of exudate -> model -> metabolite courses.

use super::enumerate::ExudatePaths;
use crate::error::TrophicError;
use log::{debug, warn};
use std::{
    collections::{BTreeMap, BTreeSet, HashMap, HashSet},
    fmt,
};
use trophinet_schemas::{
    path::{ClassificationCount, NodeKind, PathNode, PmRecord, PmmRecord},
    reference::DaRecord,
};

/// Label used when a model has no differential-abundance score.
pub const NOT_AVAILABLE: &str = "NA";

/// Node count of an exudate -> model -> metabolite course.
pub const PM_LENGTH: usize = 3;
/// Node count of an exudate -> model -> metabolite -> model -> metabolite course.
pub const PMM_LENGTH: usize = 5;

/// GSMM id -> differential-abundance label.
#[derive(Debug, Clone, Default)]
pub struct DaTable {
    scores: HashMap<String, String>,
}

impl DaTable {
    /// Missing, empty and `NA`/`NaN` scores are all stored as absent.
    /// When a model is listed more than once, its first row wins.
    pub fn from_records(records: Vec<DaRecord>) -> Self {
        let mut scores = HashMap::new();
        let mut seen = HashSet::new();
        for record in records {
            if !seen.insert(record.gsmm.clone()) {
                debug!("Ignoring repeated score row for '{}'", record.gsmm);
                continue;
            }
            let Some(score) = record.score.map(|s| s.trim().to_string()) else {
                continue;
            };
            let missing = score.is_empty()
                || score.eq_ignore_ascii_case("na")
                || score.eq_ignore_ascii_case("nan");
            if !missing {
                scores.entry(record.gsmm).or_insert(score);
            }
        }
        Self { scores }
    }

    /// The model's label, or `NOT_AVAILABLE`.
    pub fn label(&self, gsmm: &str) -> &str {
        match self.scores.get(gsmm) {
            Some(score) => score.as_str(),
            None => {
                debug!("No differential-abundance score for '{}'", gsmm);
                NOT_AVAILABLE
            }
        }
    }
}

/// The labels of the models along one course, in path order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Classification {
    Single(String),
    Pair(String, String),
}

impl Classification {
    pub fn labels(&self) -> Vec<&str> {
        match self {
            Classification::Single(a) => vec![a.as_str()],
            Classification::Pair(a, b) => vec![a.as_str(), b.as_str()],
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Single(a) => write!(f, "{}", a),
            Classification::Pair(a, b) => write!(f, "('{}', '{}')", a, b),
        }
    }
}

fn malformed(path: &[PathNode], reason: &str) -> TrophicError {
    TrophicError::MalformedPath(
        path.iter().map(|n| n.id.clone()).collect(),
        reason.to_string(),
    )
}

/// Classifies a 3- or 5-node course by the labels of its model nodes.
pub fn classify(path: &[PathNode], da: &DaTable) -> Result<Classification, TrophicError> {
    let mut labels = path
        .iter()
        .filter(|n| n.kind == NodeKind::Model)
        .map(|n| da.label(&n.id).to_string());
    let classification = match (path.len(), labels.next(), labels.next(), labels.next()) {
        (PM_LENGTH, Some(a), None, None) => Classification::Single(a),
        (PMM_LENGTH, Some(a), Some(b), None) => Classification::Pair(a, b),
        (PM_LENGTH, ..) | (PMM_LENGTH, ..) => {
            return Err(malformed(path, "unexpected number of model nodes"))
        }
        _ => return Err(malformed(path, "only 3- and 5-node courses are classified")),
    };
    Ok(classification)
}

/// PM and PMM rows for a set of exudate snapshots.
#[derive(Debug, Clone, Default)]
pub struct ClassifiedCourses {
    pub pm: Vec<PmRecord>,
    pub pmm: Vec<PmmRecord>,
}

/// Keeps the 3- and 5-node paths of every snapshot and classifies them.
/// Paths of any other length are ignored; paths whose model nodes do not fit
/// the course shape are logged and skipped.
pub fn classify_courses(snapshots: &[ExudatePaths], da: &DaTable) -> ClassifiedCourses {
    let mut courses = ClassifiedCourses::default();
    for snapshot in snapshots {
        for path in &snapshot.paths {
            if path.len() != PM_LENGTH && path.len() != PMM_LENGTH {
                continue;
            }
            let classification = match classify(path, da) {
                Ok(classification) => classification.to_string(),
                Err(e) => {
                    warn!("Skipping course of exudate '{}': {}", snapshot.exudate, e);
                    continue;
                }
            };
            if path.len() == PM_LENGTH {
                courses.pm.push(PmRecord {
                    exudate: path[0].id.clone(),
                    gsmm1: path[1].id.clone(),
                    metabolite1: path[2].id.clone(),
                    classification,
                });
            } else {
                courses.pmm.push(PmmRecord {
                    exudate: path[0].id.clone(),
                    gsmm1: path[1].id.clone(),
                    metabolite1: path[2].id.clone(),
                    gsmm2: path[3].id.clone(),
                    metabolite2: path[4].id.clone(),
                    classification,
                });
            }
        }
    }
    courses
}

/// Counts rows per course type and classification. Labels outside `known_labels`
/// are counted but reported.
pub fn summarize(courses: &ClassifiedCourses, known_labels: &[String]) -> Vec<ClassificationCount> {
    let known: BTreeSet<&str> = known_labels.iter().map(String::as_str).collect();
    let mut counts: BTreeMap<(&str, &str), usize> = BTreeMap::new();
    for record in &courses.pm {
        *counts.entry(("PM", record.classification.as_str())).or_insert(0) += 1;
    }
    for record in &courses.pmm {
        *counts.entry(("PMM", record.classification.as_str())).or_insert(0) += 1;
    }

    let mut unknown = BTreeSet::new();
    for label in courses
        .pm
        .iter()
        .map(|r| r.classification.as_str())
        .chain(courses.pmm.iter().flat_map(|r| pair_labels(&r.classification)))
    {
        if !known.is_empty() && !known.contains(label) {
            unknown.insert(label);
        }
    }
    for label in unknown {
        warn!("Classification label '{}' is not in the configured label set", label);
    }

    counts
        .into_iter()
        .map(|((course, classification), count)| ClassificationCount {
            course: course.to_string(),
            classification: classification.to_string(),
            count,
        })
        .collect()
}

fn pair_labels(formatted: &str) -> impl Iterator<Item = &str> {
    formatted
        .trim_start_matches('(')
        .trim_end_matches(')')
        .split(", ")
        .map(|l| l.trim_matches('\''))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, kind: NodeKind) -> PathNode {
        PathNode {
            id: id.to_string(),
            kind,
        }
    }

    fn course(ids: &[&str]) -> Vec<PathNode> {
        ids.iter()
            .enumerate()
            .map(|(i, id)| {
                let kind = if i % 2 == 1 { NodeKind::Model } else { NodeKind::Compound };
                node(id, kind)
            })
            .collect()
    }

    fn da() -> DaTable {
        DaTable::from_records(vec![
            DaRecord {
                gsmm: "G001".to_string(),
                score: Some("BjSA".to_string()),
            },
            DaRecord {
                gsmm: "G002".to_string(),
                score: Some("NTC".to_string()),
            },
            DaRecord {
                gsmm: "G003".to_string(),
                score: None,
            },
        ])
    }

    #[test]
    fn missing_scores_become_the_sentinel() {
        let table = da();
        assert_eq!(table.label("G003"), NOT_AVAILABLE);
        assert_eq!(table.label("G007"), NOT_AVAILABLE);
        assert_eq!(table.label("G001"), "BjSA");
    }

    #[test]
    fn three_node_courses_have_one_label() {
        let c = classify(&course(&["EX_glc", "G007", "EX_ac"]), &da()).unwrap();
        assert_eq!(c, Classification::Single("NA".to_string()));
        assert_eq!(c.labels().len(), 1);
        assert_eq!(c.to_string(), "NA");
    }

    #[test]
    fn five_node_courses_have_two_labels_in_path_order() {
        let c = classify(&course(&["EX_glc", "G002", "EX_ac", "G001", "EX_for"]), &da()).unwrap();
        assert_eq!(c, Classification::Pair("NTC".to_string(), "BjSA".to_string()));
        assert_eq!(c.to_string(), "('NTC', 'BjSA')");
    }

    #[test]
    fn other_lengths_are_rejected_by_classify() {
        assert!(classify(&course(&["EX_glc", "G001", "EX_ac", "G002"]), &da()).is_err());
        let all_compounds = vec![
            node("EX_glc", NodeKind::Compound),
            node("EX_ac", NodeKind::Compound),
            node("EX_for", NodeKind::Compound),
        ];
        assert!(classify(&all_compounds, &da()).is_err());
    }

    #[test]
    fn courses_keep_only_three_and_five_node_paths() {
        let snapshot = ExudatePaths {
            exudate: "EX_glc".to_string(),
            paths: vec![
                course(&["EX_glc", "G001", "EX_ac"]),
                course(&["EX_glc", "G001", "EX_ac", "G002"]),
                course(&["EX_glc", "G001", "EX_ac", "G002", "EX_for"]),
                course(&["EX_glc", "G001", "EX_ac", "G002", "EX_for", "G003"]),
            ],
        };
        let courses = classify_courses(&[snapshot], &da());

        assert_eq!(courses.pm.len(), 1);
        assert_eq!(courses.pmm.len(), 1);
        assert_eq!(courses.pm[0].classification, "BjSA");
        assert_eq!(courses.pmm[0].gsmm2, "G002");
        assert_eq!(courses.pmm[0].classification, "('BjSA', 'NTC')");
    }

    #[test]
    fn summary_counts_per_course_and_classification() {
        let snapshot = ExudatePaths {
            exudate: "EX_glc".to_string(),
            paths: vec![
                course(&["EX_glc", "G001", "EX_ac"]),
                course(&["EX_glc", "G001", "EX_lac"]),
                course(&["EX_glc", "G003", "EX_for"]),
            ],
        };
        let courses = classify_courses(&[snapshot], &da());
        let labels = vec!["BjSA".to_string(), "NTC".to_string(), "NA".to_string()];
        let summary = summarize(&courses, &labels);

        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].classification, "BjSA");
        assert_eq!(summary[0].count, 2);
        assert_eq!(summary[1].classification, "NA");
    }

    #[test]
    fn first_score_row_wins_for_repeated_models() {
        let table = DaTable::from_records(vec![
            DaRecord {
                gsmm: "G001".to_string(),
                score: Some("BjSA".to_string()),
            },
            DaRecord {
                gsmm: "G001".to_string(),
                score: Some("NTC".to_string()),
            },
            DaRecord {
                gsmm: "G002".to_string(),
                score: None,
            },
            DaRecord {
                gsmm: "G002".to_string(),
                score: Some("NTC".to_string()),
            },
        ]);
        assert_eq!(table.label("G001"), "BjSA");
        assert_eq!(table.label("G002"), NOT_AVAILABLE);
    }

    #[test]
    fn misshapen_courses_are_skipped_not_fatal() {
        // a model id used as exudate gives model -> compound -> model
        let snapshot = ExudatePaths {
            exudate: "G001".to_string(),
            paths: vec![
                vec![
                    node("G001", NodeKind::Model),
                    node("EX_ac", NodeKind::Compound),
                    node("G002", NodeKind::Model),
                ],
                course(&["EX_glc", "G002", "EX_for"]),
            ],
        };
        let courses = classify_courses(&[snapshot], &da());

        assert_eq!(courses.pm.len(), 1);
        assert_eq!(courses.pm[0].gsmm1, "G002");
        assert_eq!(courses.pm[0].classification, "NTC");
        assert!(courses.pmm.is_empty());
    }
}
