use std::time::Duration;

use docr::{Config, HttpSource, LibraryStore, Registry};

/// Everything a command needs, built once from the loaded config
pub struct Context {
    pub config: Config,
    pub store: LibraryStore,
    pub source: HttpSource,
}

impl Context {
    pub fn new(config: Config) -> Self {
        let store = LibraryStore::new(&config.library_dir);
        let source = HttpSource::new(
            config.sources.clone(),
            Duration::from_secs(config.timeout_secs),
        );
        Self {
            config,
            store,
            source,
        }
    }

    pub fn registry(&self) -> Registry<'_, HttpSource> {
        Registry::new(&self.store, &self.source, self.config.staging_dir())
    }
}
