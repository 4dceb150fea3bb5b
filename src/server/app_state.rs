use crate::config::Config;
use crate::station::Station;
use crate::storage::FileStore;

/// Top-level application state.
pub struct AppState {
    pub station: Station,
    pub files: FileStore,
    pub config: Config,
}
