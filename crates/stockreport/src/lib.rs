#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod engine;
pub mod logging;
pub mod models;
pub mod sqlite;
pub mod utils;

pub use cli::app::{Cli, Command};
