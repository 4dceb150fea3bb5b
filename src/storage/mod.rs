pub mod docs;
pub mod files;

pub use docs::{DocumentStore, PLAYLIST_DOC, STATION_DOC};
pub use files::FileStore;
