//! Configuration for QuestKV
//!
//! An explicit configuration value constructed at startup and passed into
//! [`PersistentStore::open`](crate::store::PersistentStore::open). There is
//! no process-wide mutable configuration state.

use std::path::PathBuf;

/// Main configuration for a QuestKV store instance
#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory for all snapshot files.
    /// Internal structure:
    ///   {data_dir}/
    ///     ├── exercises.dat
    ///     ├── users.dat
    ///     ├── workouts.dat
    ///     ├── quests.dat
    ///     ├── email_index.dat
    ///     ├── graph.dat
    ///     └── priority_queue.dat
    pub data_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./questkv_data"),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory (root for all snapshot files)
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
