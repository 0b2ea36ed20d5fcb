//! Single-purpose persistence operations.
//!
//! Each capability is its own trait so callers depend on exactly what they
//! use. The sea-orm adapters implement all of them on one struct.

pub mod image;
pub mod user;

pub use image::{CreateImage, DeleteImage, ImageStore, IndexImages, SeaOrmImageStore, ShowImage, UpdateImage};
pub use user::{SeaOrmUserStore, UserRecord, UserStore};
