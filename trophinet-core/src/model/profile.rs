//! A model backed by a precomputed growth/secretion profile file.

use super::{FluxRange, MetabolicModel, ModelSource, SecretionProfile};
use crate::{
    error::{ModelError, TrophicError},
    medium::Medium,
};
use log::{debug, info};
use std::{
    collections::BTreeSet,
    fs,
    path::{Path, PathBuf},
};
use trophinet_schemas::{file_formats::ModelFile, model_profile::ModelProfile};

const MODEL_EXTENSIONS: [&str; 3] = ["yaml", "yml", "json"];

#[derive(Debug, Clone)]
pub struct ProfileModel {
    profile: ModelProfile,
    exchanges: BTreeSet<String>,
    medium: Medium,
    optimized: bool,
}

impl ProfileModel {
    /// Validates that every exchange the profile refers to is one the model holds.
    pub fn new(profile: ModelProfile) -> Result<Self, TrophicError> {
        let exchanges: BTreeSet<String> = profile.exchanges.iter().cloned().collect();
        let referenced = profile
            .growth
            .requires
            .iter()
            .chain(profile.secretions.iter().map(|s| &s.exchange))
            .chain(profile.secretions.iter().flat_map(|s| s.when.iter()));
        for exchange in referenced {
            if !exchanges.contains(exchange) {
                return Err(TrophicError::ModelLoad(
                    profile.model_id.clone(),
                    format!("exchange '{}' is not declared by the model", exchange),
                ));
            }
        }
        Ok(Self {
            profile,
            exchanges,
            medium: Medium::new(),
            optimized: false,
        })
    }

    pub fn profile(&self) -> &ModelProfile {
        &self.profile
    }

    pub fn medium(&self) -> &Medium {
        &self.medium
    }
}

impl MetabolicModel for ProfileModel {
    fn id(&self) -> &str {
        &self.profile.model_id
    }

    fn exchange_ids(&self) -> &BTreeSet<String> {
        &self.exchanges
    }

    fn set_medium(&mut self, medium: Medium) {
        self.medium = medium;
        self.optimized = false;
    }

    fn optimize_growth(&mut self) -> Result<f64, ModelError> {
        if self.medium.is_empty() {
            return Err(ModelError::Infeasible("empty medium".to_string()));
        }
        let missing: Vec<&str> = self
            .profile
            .growth
            .requires
            .iter()
            .filter(|ex| !self.medium.contains(ex))
            .map(String::as_str)
            .collect();
        if !missing.is_empty() {
            return Err(ModelError::Infeasible(format!(
                "missing required exchanges: {}",
                missing.join(", ")
            )));
        }
        self.optimized = true;
        Ok(self.profile.growth.rate.max(0.0))
    }

    fn secretion_profile(&self) -> Result<SecretionProfile, ModelError> {
        if !self.optimized {
            return Err(ModelError::NotOptimized);
        }
        Ok(self
            .profile
            .secretions
            .iter()
            .filter(|s| s.when.iter().all(|ex| self.medium.contains(ex)))
            .map(|s| {
                (
                    s.exchange.clone(),
                    FluxRange {
                        lower: s.lower,
                        upper: s.upper,
                    },
                )
            })
            .collect())
    }
}

/// Loads `ProfileModel`s from a directory holding one `<model id>.yaml|.yml|.json` per species.
#[derive(Debug, Clone)]
pub struct ProfileModelSource {
    dir: PathBuf,
}

impl ProfileModelSource {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read_file(path: &Path) -> Result<ProfileModel, TrophicError> {
        let path_str = path.display().to_string();
        let content =
            fs::read_to_string(path).map_err(|e| TrophicError::FileIO(path_str.clone(), e))?;
        let file: ModelFile = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| TrophicError::ModelLoad(path_str.clone(), e.to_string()))?,
            _ => serde_yaml::from_str(&content)
                .map_err(|e| TrophicError::YamlParsing(path_str.clone(), e))?,
        };
        ProfileModel::new(file.model)
    }
}

fn is_model_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .map_or(false, |e| MODEL_EXTENSIONS.contains(&e))
}

impl ModelSource for ProfileModelSource {
    type Model = ProfileModel;

    fn load_all(&self) -> Result<Vec<ProfileModel>, TrophicError> {
        let dir_str = self.dir.display().to_string();
        let mut paths = Vec::new();
        for entry in
            fs::read_dir(&self.dir).map_err(|e| TrophicError::FileIO(dir_str.clone(), e))?
        {
            let path = entry
                .map_err(|e| TrophicError::FileIO(dir_str.clone(), e))?
                .path();
            if is_model_file(&path) {
                paths.push(path);
            }
        }
        paths.sort();

        let mut seen = BTreeSet::new();
        let mut models = Vec::with_capacity(paths.len());
        for path in paths {
            let model = Self::read_file(&path)?;
            if !seen.insert(model.id().to_string()) {
                return Err(TrophicError::ModelLoad(
                    path.display().to_string(),
                    format!("duplicate model id '{}'", model.id()),
                ));
            }
            debug!("Loaded model '{}' from {:?}", model.id(), path);
            models.push(model);
        }

        if models.is_empty() {
            return Err(TrophicError::NoModelsFound(dir_str));
        }
        info!("Loaded {} models from '{}'", models.len(), dir_str);
        Ok(models)
    }

    fn load(&self, model_id: &str) -> Result<ProfileModel, TrophicError> {
        let path = MODEL_EXTENSIONS
            .iter()
            .map(|ext| self.dir.join(format!("{}.{}", model_id, ext)))
            .find(|p| p.is_file())
            .ok_or_else(|| TrophicError::ModelNotFound(model_id.to_string()))?;
        Self::read_file(&path)
    }
}
