pub mod image;
pub mod ordering;

pub use image::{ImageId, ImageRecord, NewImage};
pub use ordering::{OrderAssignment, OrderingPolicy};
