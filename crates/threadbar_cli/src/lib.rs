pub mod config;
pub mod render;
mod runner;
pub mod snapshot;

pub use runner::{load_older_pages, run_effects, start_sidebar};
