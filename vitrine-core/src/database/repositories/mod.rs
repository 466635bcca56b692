pub mod catalog;

pub use catalog::SqliteCatalogRepository;
