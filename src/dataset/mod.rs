mod error;
mod loader;
pub mod schema;

pub use error::{DatasetError, SchemaError};
pub use loader::Dataset;
