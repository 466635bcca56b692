//! # Vitrine Core
//!
//! Core library for the Vitrine image gallery: an ordered catalog of images
//! whose rows, files and display positions are kept consistent across
//! upload, rename, reorder, annotate and delete.
//!
//! ## Architecture
//!
//! - [`database`]: the catalog store port and its SQLite adapter
//! - [`storage`]: the file store port, local-disk adapter and URL mapping
//! - [`domain`]: image records and the ordering policy
//! - [`annotate`]: text overlay rendering
//! - [`image_service`]: orchestration over catalog and file store
//! - [`api`]: route constants and wire types shared with clients

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

pub mod annotate;
pub mod api;
pub mod database;
pub mod domain;
pub mod error;
pub mod image_service;
pub mod storage;

pub use annotate::{Annotation, TextRenderer};
pub use database::{CatalogDatabase, ports::catalog::CatalogRepository};
pub use domain::{ImageId, ImageRecord, NewImage, OrderingPolicy};
pub use error::{GalleryError, Result};
pub use image_service::{
    ImageService, NamingStrategy, PublishedImage, RejectionPolicy, UploadFile,
    UploadOptions,
};
pub use storage::{FileStore, LocalFileStore, PublicUrlMapper};

/// Embedded catalog migrations.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
