pub mod dispatch;
pub mod engine;
pub mod packager;
pub mod placeholders;
pub mod template;

pub use crate::domain::model::{
    EmployeeProfile, GenerationMode, GenerationRequest, GeneratorSettings, PlaceholderMap,
    RenderedDocument,
};
pub use crate::domain::ports::{AvatarSource, ConfigProvider, ProfileSource, Storage, TemplateSource};
pub use crate::utils::error::Result;
