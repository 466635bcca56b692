pub mod images;
pub mod legacy;
