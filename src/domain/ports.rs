use crate::domain::model::{
    EmployeeProfile, DEFAULT_ANONYMIZED_NAME, DEFAULT_AVATAR_PART, DEFAULT_BUNDLE_FILENAME,
    DEFAULT_DOCUMENT_EXTENSION, DEFAULT_MAX_AVATAR_BYTES, DEFAULT_SLIDE_PREFIX,
};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn template_path(&self) -> &str;
    fn output_path(&self) -> &str;

    fn slide_prefix(&self) -> &str {
        DEFAULT_SLIDE_PREFIX
    }

    fn avatar_part(&self) -> &str {
        DEFAULT_AVATAR_PART
    }

    fn anonymized_name(&self) -> &str {
        DEFAULT_ANONYMIZED_NAME
    }

    fn document_extension(&self) -> &str {
        DEFAULT_DOCUMENT_EXTENSION
    }

    fn bundle_filename(&self) -> &str {
        DEFAULT_BUNDLE_FILENAME
    }

    fn cache_template(&self) -> bool {
        true
    }

    fn max_avatar_bytes(&self) -> usize {
        DEFAULT_MAX_AVATAR_BYTES
    }
}

/// Fails with `NotFoundError` when the id has no profile.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn fetch_profile(&self, employee_id: &str) -> Result<EmployeeProfile>;
}

#[async_trait]
pub trait AvatarSource: Send + Sync {
    async fn fetch_avatar(&self, employee_id: &str) -> Result<Option<Vec<u8>>>;
}

#[async_trait]
pub trait TemplateSource: Send + Sync {
    async fn load_template(&self) -> Result<Vec<u8>>;
}
