use crate::core::dispatch::{dispatch, GenerationResult};
use crate::core::packager::pack;
use crate::core::placeholders::extract;
use crate::core::template::{TemplateContainer, TemplateRenderer};
use crate::core::{AvatarSource, ProfileSource, TemplateSource};
use crate::domain::model::{GenerationMode, GenerationRequest, GeneratorSettings, RenderedDocument};
use crate::utils::error::{OnePagerError, Result};
use std::sync::Arc;
use tokio::sync::OnceCell;

pub struct OnePagerEngine<P, A, T>
where
    P: ProfileSource,
    A: AvatarSource,
    T: TemplateSource,
{
    profiles: P,
    avatars: A,
    templates: T,
    settings: GeneratorSettings,
    renderer: TemplateRenderer,
    cached_template: OnceCell<Arc<TemplateContainer>>,
}

impl<P, A, T> OnePagerEngine<P, A, T>
where
    P: ProfileSource,
    A: AvatarSource,
    T: TemplateSource,
{
    pub fn new(profiles: P, avatars: A, templates: T, settings: GeneratorSettings) -> Self {
        let renderer = TemplateRenderer::from_settings(&settings);
        Self {
            profiles,
            avatars,
            templates,
            settings,
            renderer,
            cached_template: OnceCell::new(),
        }
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    /// Load, parse and validate the template. The parse is shared read-only when
    /// caching is on; renders never touch it.
    pub async fn template(&self) -> Result<Arc<TemplateContainer>> {
        if self.settings.cache_template {
            let template = self
                .cached_template
                .get_or_try_init(|| self.load_template())
                .await?;
            Ok(Arc::clone(template))
        } else {
            self.load_template().await
        }
    }

    async fn load_template(&self) -> Result<Arc<TemplateContainer>> {
        let bytes = self.templates.load_template().await?;
        tracing::debug!("Loaded template ({} bytes)", bytes.len());

        let template = TemplateContainer::parse(&bytes)?;
        self.renderer.validate(&template)?;
        Ok(Arc::new(template))
    }

    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        request.validate()?;

        let ids = request.employee_ids();
        let mode = request.mode();
        tracing::info!(
            "📄 Generating {} one-pager(s) in {:?} mode",
            ids.len(),
            mode
        );

        let template = self.template().await?;

        // 依請求順序逐一處理，任何一位失敗即中止整批
        let mut documents = Vec::with_capacity(ids.len());
        for employee_id in ids {
            let document = self.render_employee(&template, employee_id, mode).await?;
            documents.push(document);
        }

        let package = pack(documents, &self.settings.document_extension)?;
        let result = dispatch(package, &self.settings.bundle_filename);

        tracing::info!(
            "✅ Generated {} ({} bytes, {})",
            result.filename,
            result.bytes.len(),
            result.content_type
        );
        Ok(result)
    }

    async fn render_employee(
        &self,
        template: &TemplateContainer,
        employee_id: &str,
        mode: GenerationMode,
    ) -> Result<RenderedDocument> {
        tracing::debug!("Fetching profile for {}", employee_id);
        let profile = self.profiles.fetch_profile(employee_id).await?;

        let placeholders = extract(&profile, mode, &self.settings.anonymized_name);

        let avatar = if mode.is_external() || !profile.has_avatar {
            None
        } else {
            self.fetch_bounded_avatar(employee_id).await?
        };

        let bytes = self
            .renderer
            .render(template, &placeholders, avatar.as_deref())?;
        tracing::debug!(
            "Rendered one-pager for {} ({} bytes, avatar: {})",
            employee_id,
            bytes.len(),
            avatar.is_some()
        );

        Ok(RenderedDocument {
            employee_id: employee_id.to_string(),
            bytes,
        })
    }

    async fn fetch_bounded_avatar(&self, employee_id: &str) -> Result<Option<Vec<u8>>> {
        let avatar = self.avatars.fetch_avatar(employee_id).await?;

        match avatar {
            Some(bytes) if bytes.len() > self.settings.max_avatar_bytes => {
                Err(OnePagerError::ProcessingError {
                    message: format!(
                        "avatar for '{}' is {} bytes, limit is {}",
                        employee_id,
                        bytes.len(),
                        self.settings.max_avatar_bytes
                    ),
                })
            }
            Some(bytes) => Ok(Some(bytes)),
            None => {
                tracing::warn!("Profile {} flags an avatar but none was found", employee_id);
                Ok(None)
            }
        }
    }
}
