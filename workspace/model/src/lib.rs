pub mod entities;
pub mod error;
pub mod password;

pub use error::{ModelError, Result};
