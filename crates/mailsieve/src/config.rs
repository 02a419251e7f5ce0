use crate::error::{MailsieveError, Result};
use crate::features::FeaturizerOptions;
use crate::model::Hyperparameters;
use crate::store::LabelStore;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use xdg::BaseDirectories;

const APP_PREFIX: &str = "mailsieve";
const TRAINING_ENV: &str = "MAILSIEVE_TRAINING";
const TEST_ENV: &str = "MAILSIEVE_TEST";

/// Contents of `mailsieve.toml`. Relative paths are taken relative to the
/// directory holding the file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub training: Option<PathBuf>,
    pub test: Option<PathBuf>,
    pub inbox: Option<PathBuf>,
    pub model: Hyperparameters,
    pub features: FeaturizerOptions,
}

impl ConfigFile {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            MailsieveError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        let mut file = Self::from_toml(&content)?;

        if let Some(base) = path.parent() {
            for entry in [&mut file.training, &mut file.test, &mut file.inbox] {
                if let Some(p) = entry.as_mut() {
                    if p.is_relative() {
                        *p = base.join(&*p);
                    }
                }
            }
        }

        Ok(file)
    }

    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str)
            .map_err(|e| MailsieveError::Config(format!("Failed to parse TOML: {}", e)))
    }
}

/// Values supplied on the command line; they win over everything else.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_file: Option<PathBuf>,
    pub training: Option<PathBuf>,
    pub test: Option<PathBuf>,
    pub inbox: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub training_path: PathBuf,
    pub test_path: PathBuf,
    pub inbox_path: Option<PathBuf>,
    pub hyperparameters: Hyperparameters,
    pub features: FeaturizerOptions,
    pub config_path: Option<PathBuf>,
}

impl Config {
    /// Resolve each path from the CLI flag, then the environment, then the
    /// config file, then the XDG data directory.
    pub fn new(overrides: ConfigOverrides) -> Result<Self> {
        let config_path = match &overrides.config_file {
            Some(path) => Some(path.clone()),
            None => BaseDirectories::with_prefix(APP_PREFIX)
                .ok()
                .and_then(|xdg| xdg.find_config_file(format!("{}.toml", APP_PREFIX))),
        };

        let file = match &config_path {
            Some(path) => {
                log::info!("Loading config from {}", path.display());
                ConfigFile::from_file(path)?
            }
            None => ConfigFile::default(),
        };

        let mut config = Self::resolve(
            overrides,
            file,
            |key| std::env::var(key).ok(),
            default_data_file,
        )?;
        config.config_path = config_path;
        Ok(config)
    }

    /// Layer the sources without touching the process environment or disk.
    pub fn resolve<E, D>(
        overrides: ConfigOverrides,
        file: ConfigFile,
        env: E,
        default: D,
    ) -> Result<Self>
    where
        E: Fn(&str) -> Option<String>,
        D: Fn(&str) -> Result<PathBuf>,
    {
        file.model.validate()?;
        file.features.validate()?;

        let training_path = match overrides
            .training
            .or_else(|| env(TRAINING_ENV).map(PathBuf::from))
            .or(file.training)
        {
            Some(path) => path,
            None => default("training.txt")?,
        };

        let test_path = match overrides
            .test
            .or_else(|| env(TEST_ENV).map(PathBuf::from))
            .or(file.test)
        {
            Some(path) => path,
            None => default("test.txt")?,
        };

        Ok(Self {
            training_path,
            test_path,
            inbox_path: overrides.inbox.or(file.inbox),
            hyperparameters: file.model,
            features: file.features,
            config_path: None,
        })
    }

    pub fn ensure_data_directory(&self) -> Result<()> {
        for path in [&self.training_path, &self.test_path] {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
        }
        Ok(())
    }

    pub fn training_store(&self) -> LabelStore {
        LabelStore::new(&self.training_path)
    }

    pub fn test_store(&self) -> LabelStore {
        LabelStore::new(&self.test_path)
    }
}

fn default_data_file(name: &str) -> Result<PathBuf> {
    let xdg = BaseDirectories::with_prefix(APP_PREFIX)
        .map_err(|e| {
            MailsieveError::Config(format!("Failed to initialize XDG directories: {}", e))
        })?;
    xdg.place_data_file(name)
        .map_err(|e| MailsieveError::Config(format!("Failed to create data directory: {}", e)))
}
