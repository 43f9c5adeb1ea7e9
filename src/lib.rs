pub mod boundary;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod locator;
pub mod logging;
pub mod planner;
pub mod rewriter;
pub mod store;
pub mod ui;

pub use error::{IncrementalError, Result};
