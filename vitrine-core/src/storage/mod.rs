//! On-disk image storage.

pub mod file_store;
pub mod keys;
pub mod public_url;

pub use file_store::{FileStore, LocalFileStore};
pub use public_url::PublicUrlMapper;
