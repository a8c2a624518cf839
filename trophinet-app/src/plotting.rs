//! Renders the round-by-round expansion of the community and the course
//! classification counts from the artifacts a run leaves behind.

use anyhow::{Context, Result};
use log::{info, warn};
use plotters::prelude::*;
use std::path::Path;
use trophinet_core::{artifacts::ArtifactStore, tables};
use trophinet_schemas::{growth::GrowthRecord, path::ClassificationCount};

/// Size of the medium and number of growing models after one round.
#[derive(Debug, Clone, PartialEq)]
struct RoundSummary {
    round: u32,
    medium_size: usize,
    growing_models: usize,
}

pub fn generate_all_plots(store: &ArtifactStore) -> Result<()> {
    info!("[Plotting] Generating graphs from run artifacts...");

    let rounds = read_round_summaries(store)?;
    if rounds.is_empty() {
        warn!("[Plotting] No recorded rounds; skipping the expansion plot.");
    } else {
        plot_community_expansion(store.root(), &rounds)?;
    }

    if store.summary_path().is_file() {
        let counts: Vec<ClassificationCount> = tables::read_records(store.summary_path())?;
        if counts.is_empty() {
            warn!("[Plotting] Classification summary is empty; skipping the counts plot.");
        } else {
            plot_classification_counts(store.root(), &counts)?;
        }
    } else {
        warn!("[Plotting] No classification summary; skipping the counts plot.");
    }

    info!("[Plotting] Graphs have been saved to '{}'.", store.root().display());
    Ok(())
}

/// Reads consecutive rounds starting at 1 until a medium file is missing.
fn read_round_summaries(store: &ArtifactStore) -> Result<Vec<RoundSummary>> {
    let mut summaries = Vec::new();
    let mut round = 1;
    while store.medium_path(round).is_file() {
        let medium = tables::read_medium(store.medium_path(round))?;
        let growing_models = if store.growth_path(round).is_file() {
            tables::read_records::<GrowthRecord, _>(store.growth_path(round))?.len()
        } else {
            0
        };
        summaries.push(RoundSummary {
            round: round as u32,
            medium_size: medium.len(),
            growing_models,
        });
        round += 1;
    }
    Ok(summaries)
}

/// Medium size and growing-model count per round, on a shared axis.
fn plot_community_expansion(output_dir: &Path, rounds: &[RoundSummary]) -> Result<()> {
    let path = output_dir.join("1_community_expansion.png");
    let root = BitMapBackend::new(&path, (1024, 768)).into_drawing_area();
    root.fill(&WHITE)?;

    let last_round = rounds.last().map_or(1, |r| r.round);
    let max_count = rounds
        .iter()
        .map(|r| r.medium_size.max(r.growing_models))
        .max()
        .unwrap_or(1)
        .max(1);

    let mut chart = ChartBuilder::on(&root)
        .caption("Community Expansion per Round", ("sans-serif", 40).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(1u32..last_round.max(2), 0usize..max_count + max_count / 10 + 1)?;

    chart
        .configure_mesh()
        .x_desc("Round")
        .y_desc("Count")
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            rounds.iter().map(|r| (r.round, r.medium_size)),
            BLUE.stroke_width(2),
        ))?
        .label("Medium compounds")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE.filled()));
    chart
        .draw_series(LineSeries::new(
            rounds.iter().map(|r| (r.round, r.growing_models)),
            RED.stroke_width(2),
        ))?
        .label("Growing models")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.filled()));

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    root.present()
        .with_context(|| format!("Failed to write {:?}", path))?;
    Ok(())
}

/// One bar per course type and classification.
fn plot_classification_counts(output_dir: &Path, counts: &[ClassificationCount]) -> Result<()> {
    let path = output_dir.join("2_classification_counts.png");
    let root = BitMapBackend::new(&path, (1280, 768)).into_drawing_area();
    root.fill(&WHITE)?;

    let labels: Vec<String> = counts
        .iter()
        .map(|c| format!("{} {}", c.course, c.classification))
        .collect();
    let max_count = counts.iter().map(|c| c.count as u32).max().unwrap_or(1).max(1);

    let mut chart = ChartBuilder::on(&root)
        .caption("Course Classifications", ("sans-serif", 40).into_font())
        .margin(10)
        .x_label_area_size(60)
        .y_label_area_size(50)
        .build_cartesian_2d(
            (0u32..labels.len() as u32).into_segmented(),
            0u32..max_count + max_count / 10 + 1,
        )?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len())
        .x_label_formatter(&|value| match value {
            SegmentValue::Exact(i) | SegmentValue::CenterOf(i) => {
                labels.get(*i as usize).cloned().unwrap_or_default()
            }
            SegmentValue::Last => String::new(),
        })
        .y_desc("Courses")
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(BLUE.filled())
            .margin(10)
            .data(counts.iter().enumerate().map(|(i, c)| (i as u32, c.count as u32))),
    )?;

    root.present()
        .with_context(|| format!("Failed to write {:?}", path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use trophinet_core::Medium;

    #[test]
    fn round_summaries_stop_at_first_missing_round() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path()).unwrap();
        std::fs::create_dir_all(store.media_dir()).unwrap();
        std::fs::create_dir_all(store.growths_dir()).unwrap();

        let medium = Medium::from_compounds(["EX_glc", "EX_ac"]);
        tables::write_medium(store.medium_path(1), &medium).unwrap();
        tables::write_table(
            store.growth_path(1),
            GrowthRecord::HEADER,
            &[GrowthRecord { gsmm: "G001".to_string(), growth: 0.5 }],
        )
        .unwrap();
        // Round 3 without round 2 is not reached.
        tables::write_medium(store.medium_path(3), &medium).unwrap();

        let rounds = read_round_summaries(&store).unwrap();
        assert_eq!(
            rounds,
            vec![RoundSummary { round: 1, medium_size: 2, growing_models: 1 }]
        );
    }
}
