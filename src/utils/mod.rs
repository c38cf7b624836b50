pub mod error;
pub mod files;

pub use error::{AppError, FetchError};
