use crate::domain::model::{EmployeeProfile, GenerationMode, PlaceholderMap};

pub const CERTIFICATION_SLOTS: usize = 2;
pub const PROJECT_SLOTS: usize = 4;

/// Map a profile onto the template's fixed placeholder vocabulary.
///
/// Certification slots are always present (empty string when missing), project
/// slots are omitted when the profile has fewer projects so the template keeps
/// its default text. Ordering comes from the profile as-is.
pub fn extract(
    profile: &EmployeeProfile,
    mode: GenerationMode,
    anonymized_name: &str,
) -> PlaceholderMap {
    let mut map = PlaceholderMap::new();

    let full_name = if mode.is_external() {
        anonymized_name
    } else {
        profile.full_name.as_str()
    };
    map.insert("fullName", full_name);

    for i in 0..CERTIFICATION_SLOTS {
        let certification = profile.certifications.get(i);
        map.insert(
            &format!("since{}", i),
            certification.map(|c| c.valid_from.as_str()).unwrap_or(""),
        );
        map.insert(
            &format!("competence{}", i),
            certification.map(|c| c.name.as_str()).unwrap_or(""),
        );
    }

    for (i, project) in profile.projects.iter().take(PROJECT_SLOTS).enumerate() {
        map.insert(&format!("projectRole{}", i), project.role.as_str());
        map.insert(&format!("projectIndustry{}", i), project.domain.as_str());
        map.insert(&format!("projectName{}", i), project.name.as_str());
    }

    if !profile.languages.is_empty() {
        let languages: Vec<&str> = profile
            .languages
            .iter()
            .map(|l| l.description.as_str())
            .collect();
        map.insert("languages", languages.join(", "));
    }

    if !profile.skills.is_empty() {
        let skills: Vec<&str> = profile.skills.iter().map(|s| s.name.as_str()).collect();
        map.insert("skills", skills.join("\n"));
    }

    tracing::debug!(
        "Extracted {} placeholders for employee {}",
        map.len(),
        profile.id
    );
    map
}
