pub mod routes;
pub mod types;

pub use types::{
    ApiResponse, ImageView, LegacyImageView, RenameRequest, ReorderRequest,
};
