pub mod command;
pub mod config;
pub mod error;
pub mod git;
pub mod pipeline;
pub mod project;
pub mod reconcile;
pub mod remote;
pub mod ui;
pub mod version;

pub use error::{AppshipError, Result};
