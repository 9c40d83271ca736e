pub mod config;

pub use config::{AppConfig, BlockConfig, OutputConfig, CONFIG_ENV};
