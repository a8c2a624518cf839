use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use trophinet_core::iteration::builder::DEFAULT_ROUNDS;

/// A run configuration loaded from YAML.
/// Relative paths are resolved against the directory holding the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Directory of model profile files, one per species.
    pub models_dir: PathBuf,
    /// Medium of the first round (`exchange,flux`).
    pub initial_medium: PathBuf,
    /// Root of every artifact the run writes.
    pub output_dir: PathBuf,
    #[serde(default = "default_rounds")]
    pub rounds: usize,
    #[serde(default)]
    pub stop_at_fixed_point: bool,
    /// Extra media merged in before given rounds.
    #[serde(default)]
    pub supplements: Vec<SupplementConfig>,
    pub network: NetworkConfig,
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplementConfig {
    pub round: usize,
    pub medium: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Organic compound lookup (`compound,formula`).
    pub organic_compounds: PathBuf,
    /// Defaults to the last recorded round's medium.
    #[serde(default)]
    pub final_medium: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Exudate list (`metabolite`).
    pub exudates: PathBuf,
    /// Differential abundance table (`GSMM,DA_final_score`).
    pub da_table: PathBuf,
    #[serde(default = "default_da_labels")]
    pub da_labels: Vec<String>,
    /// Only used to type the nodes of edge lists that carry no `kind` column.
    #[serde(default = "default_model_prefix")]
    pub model_prefix: String,
}

fn default_rounds() -> usize {
    DEFAULT_ROUNDS
}

fn default_da_labels() -> Vec<String> {
    ["BjSA", "NTC", "NA"].iter().map(|s| s.to_string()).collect()
}

fn default_model_prefix() -> String {
    "G".to_string()
}

impl PipelineConfig {
    /// Loads and resolves the config at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: PipelineConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML from {:?}", path))?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Ok(config.resolved_against(base))
    }

    fn resolved_against(mut self, base: &Path) -> Self {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        resolve(&mut self.models_dir);
        resolve(&mut self.initial_medium);
        resolve(&mut self.output_dir);
        for supplement in &mut self.supplements {
            resolve(&mut supplement.medium);
        }
        resolve(&mut self.network.organic_compounds);
        if let Some(final_medium) = &mut self.network.final_medium {
            resolve(final_medium);
        }
        resolve(&mut self.paths.exudates);
        resolve(&mut self.paths.da_table);
        self
    }
}
