pub mod app;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod export;
pub mod file_store;
pub mod grid;
pub mod grid_state;
pub mod logging;
pub mod models;
pub mod settings;
pub mod utils;

pub use error::{AppError, Result};
