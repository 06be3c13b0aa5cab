pub mod config;
pub mod error;
pub mod parse;
pub mod compare;
pub mod report;
pub mod run;
pub mod batch;
pub mod pipeline;
pub mod plot;

pub use config::{CompareConfig, Settings};
pub use error::{FidelityError, Result};
