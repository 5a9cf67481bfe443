use crate::domain::ports::ConfigProvider;
use crate::utils::error::{OnePagerError, Result};
use crate::utils::validation::{validate_employee_id, validate_unique};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SLIDE_PREFIX: &str = "ppt/slides/";
pub const DEFAULT_AVATAR_PART: &str = "ppt/media/image1.png";
pub const DEFAULT_ANONYMIZED_NAME: &str = "Anonymous";
pub const DEFAULT_DOCUMENT_EXTENSION: &str = "pptx";
pub const DEFAULT_BUNDLE_FILENAME: &str = "OnePagers.zip";
pub const DEFAULT_MAX_AVATAR_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certification {
    #[serde(default)]
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub valid_from: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub role: String,
    pub domain: String,
    pub name: String,
    pub start_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Language {
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeProfile {
    pub id: String,
    pub full_name: String,
    #[serde(default)]
    pub certifications: Vec<Certification>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub languages: Vec<Language>,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub has_avatar: bool,
}

impl EmployeeProfile {
    /// 解析 JSON 並依開始日期由新到舊排序專案
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let mut profile: EmployeeProfile = serde_json::from_slice(bytes)?;
        profile.sort_projects();
        Ok(profile)
    }

    /// Most recent project first. Stable, so equal dates keep their source order.
    pub fn sort_projects(&mut self) {
        self.projects
            .sort_by(|a, b| b.start_date.cmp(&a.start_date));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    #[default]
    Internal,
    /// Customer facing: the name is anonymized and no avatar is embedded.
    External,
}

impl GenerationMode {
    pub fn from_external_flag(external: bool) -> Self {
        if external {
            Self::External
        } else {
            Self::Internal
        }
    }

    pub fn is_external(self) -> bool {
        self == Self::External
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    employee_ids: Vec<String>,
    mode: GenerationMode,
}

impl GenerationRequest {
    pub fn new(employee_ids: Vec<String>, mode: GenerationMode) -> Result<Self> {
        let request = Self { employee_ids, mode };
        request.validate()?;
        Ok(request)
    }

    pub fn validate(&self) -> Result<()> {
        if self.employee_ids.is_empty() {
            return Err(OnePagerError::validation(
                "at least one employee id is required",
            ));
        }
        for id in &self.employee_ids {
            validate_employee_id(id)?;
        }
        // 重複的 id 會產生同名的壓縮檔項目
        validate_unique("employee_ids", &self.employee_ids)
    }

    pub fn employee_ids(&self) -> &[String] {
        &self.employee_ids
    }

    pub fn mode(&self) -> GenerationMode {
        self.mode
    }
}

/// Ordered `{token}` → value pairs. Substitution walks them in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderMap {
    entries: Vec<(String, String)>,
}

impl PlaceholderMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(key: &str) -> String {
        format!("{{{}}}", key)
    }

    /// Insert by bare key (`fullName`); an existing key keeps its position.
    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        let token = Self::token(key);
        let value = value.into();
        match self.entries.iter_mut().find(|(t, _)| *t == token) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((token, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        let token = Self::token(key);
        self.entries
            .iter()
            .find(|(t, _)| *t == token)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(t, v)| (t.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub employee_id: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorSettings {
    pub slide_prefix: String,
    pub avatar_part: String,
    pub anonymized_name: String,
    pub document_extension: String,
    pub bundle_filename: String,
    pub cache_template: bool,
    pub max_avatar_bytes: usize,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            slide_prefix: DEFAULT_SLIDE_PREFIX.to_string(),
            avatar_part: DEFAULT_AVATAR_PART.to_string(),
            anonymized_name: DEFAULT_ANONYMIZED_NAME.to_string(),
            document_extension: DEFAULT_DOCUMENT_EXTENSION.to_string(),
            bundle_filename: DEFAULT_BUNDLE_FILENAME.to_string(),
            cache_template: true,
            max_avatar_bytes: DEFAULT_MAX_AVATAR_BYTES,
        }
    }
}

impl GeneratorSettings {
    pub fn from_provider<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        Self {
            slide_prefix: config.slide_prefix().to_string(),
            avatar_part: config.avatar_part().to_string(),
            anonymized_name: config.anonymized_name().to_string(),
            document_extension: config.document_extension().to_string(),
            bundle_filename: config.bundle_filename().to_string(),
            cache_template: config.cache_template(),
            max_avatar_bytes: config.max_avatar_bytes(),
        }
    }
}
