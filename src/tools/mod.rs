pub mod export;
mod error;

pub use error::{Context, Error, Result, Source};
