use anyhow::{Context as AnyhowContext, Result};
use legend_dataset::{load_roster, locate_dataset, Roster};
use legend_engine::{Candidate, Conference, DecisionTree, EngineConfig, Session};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Resolved inputs shared by every subcommand and the HTTP server
#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: EngineConfig,
    pub data_path: PathBuf,
}

impl AppContext {
    /// Explicit paths win; otherwise the roster is searched for under `root`.
    pub fn resolve(root: &Path, config: Option<&Path>, data: Option<&Path>) -> Result<Self> {
        let config = match config {
            Some(path) => EngineConfig::from_file(path)?,
            None => EngineConfig::default(),
        };
        let data_path = match data {
            Some(path) => path.to_path_buf(),
            None => locate_dataset(root)?,
        };
        log::debug!(
            "Using roster {} (max_depth={}, list_threshold={}, use_tree={})",
            data_path.display(),
            config.max_depth,
            config.list_threshold,
            config.use_tree
        );
        Ok(Self { config, data_path })
    }

    pub fn load(&self) -> Result<Roster> {
        load_roster(&self.data_path)
            .with_context(|| format!("Failed to load roster from {}", self.data_path.display()))
    }

    pub fn session(&self) -> Session {
        Session::new(self.config.clone())
    }

    /// The tree sessions should follow, if the configuration wants one
    pub fn train(&self, pool: &[Candidate]) -> Option<DecisionTree> {
        self.config
            .use_tree
            .then(|| DecisionTree::train(pool, &self.config))
    }
}

/// A roster entry as listed to clients
#[derive(Debug, Serialize)]
pub struct PlayerRecord<'a> {
    #[serde(flatten)]
    pub candidate: &'a Candidate,
    pub conference: Conference,
}

pub fn player_records(pool: &[Candidate]) -> Vec<PlayerRecord<'_>> {
    pool.iter()
        .map(|candidate| PlayerRecord {
            candidate,
            conference: candidate.conference(),
        })
        .collect()
}
