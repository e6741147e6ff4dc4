//! Object storage: camera images, classification documents and archives.

pub mod error;
mod local;
pub mod traits;

pub use error::ObjectStoreError;
pub use local::LocalObjectStore;
pub use traits::ObjectStore;
