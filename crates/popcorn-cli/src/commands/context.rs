use color_eyre::Result;
use popcorn_config::{Config, PathManager};
use popcorn_core::{FileStore, PopcornApp, SharedTitle};
use popcorn_index::OmdbClient;
use std::sync::Arc;
use tracing::debug;

/// Everything a command needs: the loaded config and an app wired to the
/// OMDb index and the on-disk store.
pub struct AppContext {
    pub config: Config,
    pub title: SharedTitle,
    pub app: PopcornApp,
}

impl AppContext {
    /// Build the app. Commands that only touch the watched list pass
    /// `needs_index = false` and may run without an API key.
    pub fn load(needs_index: bool) -> Result<Self> {
        let paths = PathManager::default();
        paths
            .ensure_directories()
            .map_err(|e| color_eyre::eyre::eyre!("Failed to create data directories: {}", e))?;

        let config_file = paths.config_file();
        let config = Config::load_or_default(&config_file)
            .map_err(|e| color_eyre::eyre::eyre!("Failed to load config from {}: {}", config_file.display(), e))?;

        if needs_index {
            config.validate().map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
        }

        debug!("Using store at {:?}", paths.store_dir());
        let index = Arc::new(OmdbClient::new(&config.omdb));
        let store = Arc::new(FileStore::new(paths.store_dir()));
        let title = SharedTitle::new(config.display.default_title.clone());
        let app = PopcornApp::new(index, store, Arc::new(title.clone()), &config);

        Ok(Self { config, title, app })
    }
}
