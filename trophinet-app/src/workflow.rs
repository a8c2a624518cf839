use crate::config::PipelineConfig;
use anyhow::{bail, Context, Result};
use log::info;
use std::{fs, path::Path};
use trophinet_core::{
    artifacts::{ensure_dir, ArtifactStore},
    iteration::{IterationBuilder, RoundOutcome},
    model::{ModelSource, ProfileModelSource},
    network::{build_network, read_secretion_tables, TrophicNetwork},
    paths::{
        classify_courses, enumerate_exudate_paths, summarize, ClassifiedCourses, DaTable,
        ExudatePaths, TrophicGraph,
    },
    tables,
};
use trophinet_schemas::{
    file_formats::RunManifest,
    network::{EdgeRecord, SkippedModelRecord},
    path::{ClassificationCount, PmRecord, PmmRecord},
    reference::DaRecord,
};

/// Copies the config next to the artifacts and records which stage ran when.
pub fn record_run(config_path: &Path, store: &ArtifactStore, stage: &str) -> Result<()> {
    let copy = store.root().join("run.yaml");
    let same_file = match (fs::canonicalize(config_path), fs::canonicalize(&copy)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    };
    if !same_file {
        fs::copy(config_path, &copy).with_context(|| {
            format!("Failed to copy {:?} into the output directory", config_path)
        })?;
    }
    let manifest = RunManifest {
        trophinet_version: env!("CARGO_PKG_VERSION").to_string(),
        stage: stage.to_string(),
        started_at: chrono::Utc::now().to_rfc3339(),
        config_file: config_path.display().to_string(),
    };
    fs::write(
        store.root().join("run_manifest.yaml"),
        serde_yaml::to_string(&manifest)?,
    )
    .context("Failed to write run manifest")?;
    Ok(())
}

/// Stage 1: grows the community round by round and records every round.
pub fn run_iteration(config: &PipelineConfig, store: &ArtifactStore) -> Result<Vec<RoundOutcome>> {
    info!("--- [Workflow] Growth/secretion iteration ---");

    let source = ProfileModelSource::new(&config.models_dir);
    let models = source
        .load_all()
        .context("Failed to load community models")?;
    let initial_medium = tables::read_medium(&config.initial_medium)
        .context("Failed to read the initial medium")?;

    let mut builder = IterationBuilder::new()
        .with_models(models)
        .with_initial_medium(initial_medium)
        .with_rounds(config.rounds)
        .stop_at_fixed_point(config.stop_at_fixed_point)
        .with_artifact_store(store.clone());
    for supplement in &config.supplements {
        let medium = tables::read_medium(&supplement.medium).with_context(|| {
            format!("Failed to read supplement medium for round {}", supplement.round)
        })?;
        builder = builder.with_supplement(supplement.round, medium);
    }

    let rounds = builder.build()?.run()?;
    for round in &rounds {
        info!(
            "  - Round {}: {} growing, {} secreted compounds, medium of {}",
            round.round,
            round.growths.len(),
            round.secretions.compounds().len(),
            round.next_medium.len()
        );
    }
    Ok(rounds)
}

/// Stage 2: turns the recorded secretion tables into the trophic edge list.
pub fn run_network(config: &PipelineConfig, store: &ArtifactStore) -> Result<TrophicNetwork> {
    info!("--- [Workflow] Network construction ---");

    let secretion_tables = read_secretion_tables(store.secretions_dir())
        .context("Failed to read secretion tables; has the iterate stage run?")?;
    if secretion_tables.is_empty() {
        bail!("No secretion tables found in {:?}", store.secretions_dir());
    }
    let organic = tables::read_organic_compounds(&config.network.organic_compounds)
        .context("Failed to read the organic compound table")?;

    let final_medium_path = match &config.network.final_medium {
        Some(path) => path.clone(),
        None => store
            .latest_medium_path()?
            .with_context(|| format!("No medium found in {:?}", store.media_dir()))?,
    };
    info!("Final medium: {:?}", final_medium_path);
    let final_medium = tables::read_medium(&final_medium_path)?;

    let source = ProfileModelSource::new(&config.models_dir);
    let network = build_network(&source, &secretion_tables, &organic, &final_medium);

    ensure_dir(&store.network_dir())?;
    tables::write_table(store.edges_path(), EdgeRecord::HEADER, &network.edges)?;
    tables::write_table(
        store.skipped_models_path(),
        SkippedModelRecord::HEADER,
        &network.skipped,
    )?;
    Ok(network)
}

/// Stage 3a: enumerates shortest paths per exudate and snapshots them.
pub fn run_enumeration(config: &PipelineConfig, store: &ArtifactStore) -> Result<Vec<ExudatePaths>> {
    info!("--- [Workflow] Path enumeration ---");

    let edges: Vec<EdgeRecord> = tables::read_records(store.edges_path())
        .context("Failed to read the network edge list; has the network stage run?")?;
    let graph = TrophicGraph::from_edges(&edges, &config.paths.model_prefix);
    info!(
        "Graph: {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );
    let exudates = tables::read_exudates(&config.paths.exudates)?;

    ensure_dir(&store.snapshots_dir())?;
    let mut all_paths = Vec::with_capacity(exudates.len());
    for exudate in &exudates {
        let paths = enumerate_exudate_paths(&graph, exudate);
        paths.write_snapshot(store.snapshot_path(exudate))?;
        all_paths.push(paths);
    }
    Ok(all_paths)
}

/// Stage 3b: classifies the snapshotted courses and writes the PM/PMM tables.
pub fn run_classification(
    config: &PipelineConfig,
    store: &ArtifactStore,
) -> Result<ClassifiedCourses> {
    info!("--- [Workflow] Path classification ---");

    let exudates = tables::read_exudates(&config.paths.exudates)?;
    let snapshots = exudates
        .iter()
        .map(|exudate| {
            ExudatePaths::read_snapshot(store.snapshot_path(exudate), exudate).with_context(|| {
                format!("Missing path snapshot for '{}'; has the enumerate stage run?", exudate)
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let da_records: Vec<DaRecord> = tables::read_records(&config.paths.da_table)
        .context("Failed to read the differential abundance table")?;
    let da = DaTable::from_records(da_records);
    let courses = classify_courses(&snapshots, &da);

    tables::write_table(store.pm_path(), PmRecord::HEADER, &courses.pm)?;
    tables::write_table(store.pmm_path(), PmmRecord::HEADER, &courses.pmm)?;
    let summary = summarize(&courses, &config.paths.da_labels);
    tables::write_table(store.summary_path(), ClassificationCount::HEADER, &summary)?;

    info!(
        "Classified {} PM and {} PMM courses",
        courses.pm.len(),
        courses.pmm.len()
    );
    Ok(courses)
}
