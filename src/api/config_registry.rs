use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::error::{ChartError, ChartResult};

use super::ChartConfig;

/// Chart configurations loaded from `*.json` files, keyed by file stem.
#[derive(Debug, Clone, Default)]
pub struct ConfigRegistry {
    dir: Option<PathBuf>,
    configs: IndexMap<String, ChartConfig>,
}

impl ConfigRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every `*.json` file in `dir`, in file-name order.
    ///
    /// A file that fails to parse or validate fails the whole load.
    pub fn load_dir(dir: impl AsRef<Path>) -> ChartResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        let configs = read_configs(&dir)?;
        Ok(Self {
            dir: Some(dir),
            configs,
        })
    }

    /// Re-reads the directory and replaces the whole map; on error the
    /// previous map is kept.
    pub fn reload(&mut self) -> ChartResult<usize> {
        let Some(dir) = self.dir.as_ref() else {
            return Err(ChartError::InvalidConfig(
                "registry was not loaded from a directory".to_owned(),
            ));
        };
        self.configs = read_configs(dir)?;
        Ok(self.configs.len())
    }

    pub fn insert(&mut self, name: impl Into<String>, config: ChartConfig) -> Option<ChartConfig> {
        self.configs.insert(name.into(), config)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ChartConfig> {
        self.configs.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.configs.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.configs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}

fn read_configs(dir: &Path) -> ChartResult<IndexMap<String, ChartConfig>> {
    let entries = fs::read_dir(dir)
        .map_err(|e| ChartError::Io(format!("failed to read `{}`: {e}", dir.display())))?;

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ChartError::Io(format!("failed to list `{}`: {e}", dir.display())))?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        } else {
            debug!(path = %path.display(), "skipping non-json entry");
        }
    }
    paths.sort();

    let mut configs = IndexMap::with_capacity(paths.len());
    for path in paths {
        let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
            warn!(path = %path.display(), "skipping config with a non-utf8 name");
            continue;
        };
        let raw = fs::read_to_string(&path)
            .map_err(|e| ChartError::Io(format!("failed to read `{}`: {e}", path.display())))?;
        let config = ChartConfig::from_json_str(&raw).map_err(|e| {
            ChartError::InvalidConfig(format!("{}: {e}", path.display()))
        })?;
        config.validate()?;
        configs.insert(stem.to_owned(), config);
    }
    debug!(dir = %dir.display(), configs = configs.len(), "loaded chart configs");
    Ok(configs)
}
