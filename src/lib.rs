pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::{HttpProfileSource, StorageDirectory};
pub use crate::config::{cli::LocalStorage, toml_config::TomlConfig};
pub use crate::core::{dispatch::GenerationResult, engine::OnePagerEngine};
pub use crate::domain::model::{GenerationMode, GenerationRequest, GeneratorSettings};
pub use crate::utils::error::{OnePagerError, Result};
