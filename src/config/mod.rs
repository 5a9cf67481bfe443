pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::domain::model::{DEFAULT_ANONYMIZED_NAME, DEFAULT_AVATAR_PART};
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_employee_id, validate_file_extension, validate_path, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "onepager")]
#[command(about = "Render employee one-pager presentations from a pptx template")]
pub struct CliConfig {
    /// Employee ids, in the order they should appear in the bundle
    #[arg(required = true, value_delimiter = ',')]
    pub employee_ids: Vec<String>,

    #[arg(long, help = "Anonymize names and drop avatars for customer-facing output")]
    pub external: bool,

    #[arg(long, default_value = "templates/OnePager.pptx")]
    pub template: String,

    /// Directory holding `profiles/<id>.json` and `avatars/<id>.png`
    #[arg(long, default_value = "./data")]
    pub data_dir: String,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, default_value = DEFAULT_AVATAR_PART)]
    pub avatar_part: String,

    #[arg(long, default_value = DEFAULT_ANONYMIZED_NAME)]
    pub anonymized_name: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn template_path(&self) -> &str {
        &self.template
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn avatar_part(&self) -> &str {
        &self.avatar_part
    }

    fn anonymized_name(&self) -> &str {
        &self.anonymized_name
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        for id in &self.employee_ids {
            validate_employee_id(id)?;
        }
        validate_path("template", &self.template)?;
        validate_file_extension("template", &self.template, &["pptx"])?;
        validate_path("data_dir", &self.data_dir)?;
        validate_path("output_path", &self.output_path)?;
        validate_path("avatar_part", &self.avatar_part)?;
        Ok(())
    }
}
