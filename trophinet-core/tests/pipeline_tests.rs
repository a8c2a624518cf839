//! End-to-end tests: iterate -> network -> enumerate -> classify on disk.

use std::{collections::BTreeSet, fs, path::Path};
use tempfile::TempDir;
use trophinet_core::{
    artifacts::{ensure_dir, ArtifactStore},
    iteration::IterationBuilder,
    model::{ModelSource, ProfileModelSource},
    network::{build_network, read_secretion_tables},
    paths::{classify_courses, enumerate_exudate_paths, DaTable, ExudatePaths, TrophicGraph},
    tables, Medium,
};
use trophinet_schemas::{network::EdgeRecord, reference::DaRecord};

fn write_model(dir: &Path, id: &str, body: &str) {
    fs::write(dir.join(format!("{}.yaml", id)), format!("model:\n  model_id: {}\n{}", id, body)).unwrap();
}

/// G001: glucose -> acetate
/// G002: acetate -> formate
/// G007: acetate -> lactate (no DA score)
/// G009: needs citrate, never grows
fn community(dir: &Path) {
    write_model(
        dir,
        "G001",
        "  exchanges: [EX_glc, EX_ac]\n  growth:\n    rate: 0.6\n    requires: [EX_glc]\n  secretions:\n    - {exchange: EX_ac, lower: -4.0}\n",
    );
    write_model(
        dir,
        "G002",
        "  exchanges: [EX_ac, EX_for, EX_nh4]\n  growth:\n    rate: 0.2\n    requires: [EX_ac]\n  secretions:\n    - {exchange: EX_for, lower: -1.5}\n    - {exchange: EX_nh4, lower: -0.3}\n",
    );
    write_model(
        dir,
        "G007",
        "  exchanges: [EX_ac, EX_lac]\n  growth:\n    rate: 0.1\n    requires: [EX_ac]\n  secretions:\n    - {exchange: EX_lac, lower: -0.8}\n",
    );
    write_model(
        dir,
        "G009",
        "  exchanges: [EX_cit, EX_succ]\n  growth:\n    rate: 0.3\n    requires: [EX_cit]\n  secretions:\n    - {exchange: EX_succ, lower: -1.0}\n",
    );
}

struct Fixture {
    _dir: TempDir,
    models: ProfileModelSource,
    store: ArtifactStore,
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let models_dir = dir.path().join("models");
    ensure_dir(&models_dir).unwrap();
    community(&models_dir);
    let store = ArtifactStore::new(dir.path().join("target")).unwrap();
    Fixture {
        models: ProfileModelSource::new(models_dir),
        store,
        _dir: dir,
    }
}

fn organic() -> BTreeSet<String> {
    ["EX_glc", "EX_ac", "EX_for", "EX_lac", "EX_succ"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn run_iteration(fx: &Fixture, rounds: usize) -> Vec<trophinet_core::iteration::RoundOutcome> {
    IterationBuilder::new()
        .with_models(fx.models.load_all().unwrap())
        .with_initial_medium(Medium::from_compounds(["EX_glc"]))
        .with_rounds(rounds)
        .with_artifact_store(fx.store.clone())
        .build()
        .unwrap()
        .run()
        .unwrap()
}

#[test]
fn first_round_persists_growth_secretion_and_medium() {
    let fx = fixture();
    let rounds = run_iteration(&fx, 1);

    assert_eq!(rounds[0].growing_models().collect::<Vec<_>>(), vec!["G001"]);
    let medium = tables::read_medium(fx.store.medium_path(1)).unwrap();
    assert_eq!(medium, Medium::from_compounds(["EX_glc", "EX_ac"]));

    let growths = fs::read_to_string(fx.store.growth_path(1)).unwrap();
    assert!(growths.starts_with("GSMM,growth\nG001,0.6"));

    let secretions = fs::read_to_string(fx.store.secretion_path(1)).unwrap();
    assert_eq!(secretions, ",G001\nEX_ac,-4\n");

    let outcomes = fs::read_to_string(fx.store.outcome_path(1)).unwrap();
    assert!(outcomes.contains("G009,infeasible"));
}

#[test]
fn media_only_grow_across_rounds() {
    let fx = fixture();
    let rounds = run_iteration(&fx, 3);

    for round in &rounds {
        assert!(round.medium.is_subset_of(&round.next_medium));
        // models that did not grow contribute no columns
        let grown: BTreeSet<&str> = round.growing_models().collect();
        assert!(round.secretions.models().iter().all(|m| grown.contains(m.as_str())));
    }
    assert!(rounds[2].next_medium.contains("EX_lac"));
    assert!(!rounds[2].next_medium.contains("EX_succ"));
}

#[test]
fn network_uses_organic_secretions_and_final_medium_uptakes() {
    let fx = fixture();
    run_iteration(&fx, 3);

    let secretion_tables = read_secretion_tables(fx.store.secretions_dir()).unwrap();
    let final_medium = tables::read_medium(fx.store.medium_path(3)).unwrap();
    let network = build_network(&fx.models, &secretion_tables, &organic(), &final_medium);

    let uptakes: Vec<(&str, &str)> = network
        .uptakes()
        .map(|e| (e.from.as_str(), e.to.as_str()))
        .collect();
    assert!(uptakes.contains(&("EX_glc", "G001")));
    assert!(uptakes.contains(&("EX_ac", "G002")));
    assert!(uptakes.iter().all(|(_, model)| *model != "G009"));

    let secretions: Vec<(&str, &str)> = network
        .secretions()
        .map(|e| (e.from.as_str(), e.to.as_str()))
        .collect();
    assert!(secretions.contains(&("G002", "EX_for")));
    // ammonium is inorganic
    assert!(!secretions.contains(&("G002", "EX_nh4")));

    // uptake edges come first
    let first_secretion = network.edges.iter().position(|e| e.from.starts_with('G')).unwrap();
    assert!(network.edges[..first_secretion].iter().all(|e| e.to.starts_with('G')));
}

#[test]
fn missing_model_file_is_skipped_during_network_build() {
    let fx = fixture();
    run_iteration(&fx, 2);
    fs::remove_file(fx.models.dir().join("G007.yaml")).unwrap();

    let secretion_tables = read_secretion_tables(fx.store.secretions_dir()).unwrap();
    let final_medium = tables::read_medium(fx.store.medium_path(2)).unwrap();
    let network = build_network(&fx.models, &secretion_tables, &organic(), &final_medium);

    assert_eq!(network.skipped.len(), 1);
    assert_eq!(network.skipped[0].gsmm, "G007");
    assert!(network.uptakes().all(|e| e.to != "G007"));
    // its secretions are still part of the network
    assert!(network.secretions().any(|e| e.from == "G007"));
}

#[test]
fn classified_courses_from_snapshots() {
    let fx = fixture();
    run_iteration(&fx, 3);
    let secretion_tables = read_secretion_tables(fx.store.secretions_dir()).unwrap();
    let final_medium = tables::read_medium(fx.store.medium_path(3)).unwrap();
    let network = build_network(&fx.models, &secretion_tables, &organic(), &final_medium);

    ensure_dir(&fx.store.network_dir()).unwrap();
    tables::write_records(fx.store.edges_path(), &network.edges).unwrap();
    let edges: Vec<EdgeRecord> = tables::read_records(fx.store.edges_path()).unwrap();
    let graph = TrophicGraph::from_edges(&edges, "G");

    ensure_dir(&fx.store.snapshots_dir()).unwrap();
    for exudate in ["EX_glc", "glucose"] {
        enumerate_exudate_paths(&graph, exudate)
            .write_snapshot(fx.store.snapshot_path(exudate))
            .unwrap();
    }
    let snapshots: Vec<ExudatePaths> = ["EX_glc", "glucose"]
        .iter()
        .map(|e| ExudatePaths::read_snapshot(fx.store.snapshot_path(e), e).unwrap())
        .collect();
    assert!(snapshots[1].paths.is_empty());

    let da = DaTable::from_records(vec![
        DaRecord {
            gsmm: "G001".to_string(),
            score: Some("BjSA".to_string()),
        },
        DaRecord {
            gsmm: "G002".to_string(),
            score: Some("NTC".to_string()),
        },
    ]);
    let courses = classify_courses(&snapshots, &da);

    assert!(courses.pm.iter().all(|r| r.exudate == "EX_glc"));
    assert!(courses
        .pm
        .iter()
        .any(|r| r.gsmm1 == "G001" && r.metabolite1 == "EX_ac" && r.classification == "BjSA"));
    assert!(courses.pmm.iter().any(|r| r.gsmm2 == "G002"
        && r.metabolite2 == "EX_for"
        && r.classification == "('BjSA', 'NTC')"));
    assert!(courses
        .pmm
        .iter()
        .any(|r| r.gsmm2 == "G007" && r.classification == "('BjSA', 'NA')"));
}
