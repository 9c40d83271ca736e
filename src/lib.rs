//! grayquant - RGB to gray palette reduction
//!
//! PNG input/output, YAML configuration and the file pipeline around the
//! `luma-quant` filters. This library exposes modules for integration testing.

pub mod error;
pub mod models;
pub mod rendering;
pub mod services;
