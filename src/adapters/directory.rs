use crate::core::{AvatarSource, EmployeeProfile, ProfileSource, Storage, TemplateSource};
use crate::utils::error::{OnePagerError, Result};
use async_trait::async_trait;

/// Profiles, avatars and the template laid out on a [`Storage`]:
///
/// ```text
/// profiles/<id>.json
/// avatars/<id>.png
/// <template_path>
/// ```
#[derive(Debug, Clone)]
pub struct StorageDirectory<S: Storage> {
    storage: S,
    template_path: String,
}

impl<S: Storage> StorageDirectory<S> {
    pub fn new(storage: S, template_path: impl Into<String>) -> Self {
        Self {
            storage,
            template_path: template_path.into(),
        }
    }

    pub fn profile_path(employee_id: &str) -> String {
        format!("profiles/{}.json", employee_id)
    }

    pub fn avatar_path(employee_id: &str) -> String {
        format!("avatars/{}.png", employee_id)
    }
}

fn is_missing(error: &OnePagerError) -> bool {
    matches!(error, OnePagerError::IoError(e) if e.kind() == std::io::ErrorKind::NotFound)
}

#[async_trait]
impl<S: Storage> ProfileSource for StorageDirectory<S> {
    async fn fetch_profile(&self, employee_id: &str) -> Result<EmployeeProfile> {
        let path = Self::profile_path(employee_id);
        let bytes = match self.storage.read_file(&path).await {
            Ok(bytes) => bytes,
            Err(e) if is_missing(&e) => return Err(OnePagerError::not_found(employee_id)),
            Err(e) => return Err(e),
        };

        let profile = EmployeeProfile::from_json(&bytes)?;
        if profile.id != employee_id {
            tracing::warn!(
                "Profile file {} carries id '{}', expected '{}'",
                path,
                profile.id,
                employee_id
            );
        }
        Ok(profile)
    }
}

#[async_trait]
impl<S: Storage> AvatarSource for StorageDirectory<S> {
    async fn fetch_avatar(&self, employee_id: &str) -> Result<Option<Vec<u8>>> {
        match self.storage.read_file(&Self::avatar_path(employee_id)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if is_missing(&e) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl<S: Storage> TemplateSource for StorageDirectory<S> {
    async fn load_template(&self) -> Result<Vec<u8>> {
        self.storage
            .read_file(&self.template_path)
            .await
            .map_err(|e| {
                OnePagerError::template(format!(
                    "cannot read template '{}': {}",
                    self.template_path, e
                ))
            })
    }
}
