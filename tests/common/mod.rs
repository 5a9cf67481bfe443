#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use onepager::core::{AvatarSource, EmployeeProfile, ProfileSource, TemplateSource};
use onepager::domain::model::{Certification, Language, Project, Skill};
use onepager::{OnePagerError, Result};
use std::collections::HashMap;
use std::io::{Cursor, Read, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::CompressionMethod;

pub const SLIDE_ONE: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<p:sld><p:cSld><p:spTree>"#,
    r#"<a:t>{fullName}</a:t>"#,
    r#"<a:t>{since0} {competence0}</a:t><a:t>{since1} {competence1}</a:t>"#,
    r#"<a:t>{projectRole0}|{projectIndustry0}|{projectName0}</a:t>"#,
    r#"<a:t>{projectRole1}|{projectIndustry1}|{projectName1}</a:t>"#,
    r#"<a:t>{projectRole2}|{projectIndustry2}|{projectName2}</a:t>"#,
    r#"<a:t>{projectRole3}|{projectIndustry3}|{projectName3}</a:t>"#,
    r#"</p:spTree></p:cSld></p:sld>"#
);

pub const SLIDE_TWO: &str =
    r#"<p:sld><a:t>Languages: {languages}</a:t><a:t>Skills: {skills}</a:t></p:sld>"#;

pub const TEMPLATE_AVATAR: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 0];

/// Minimal pptx-shaped package with two slides and one media part.
pub fn build_template() -> Vec<u8> {
    let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    let parts: Vec<(&str, &[u8], SimpleFileOptions)> = vec![
        ("[Content_Types].xml", &b"<Types/>"[..], deflated),
        ("_rels/.rels", &b"<Relationships/>"[..], deflated),
        ("ppt/presentation.xml", &b"<p:presentation/>"[..], deflated),
        ("ppt/slides/slide1.xml", SLIDE_ONE.as_bytes(), deflated),
        ("ppt/slides/slide2.xml", SLIDE_TWO.as_bytes(), deflated),
        (
            "ppt/slides/_rels/slide1.xml.rels",
            &b"<Relationships><Relationship Target=\"../media/image1.png\"/></Relationships>"[..],
            deflated,
        ),
        ("ppt/media/image1.png", TEMPLATE_AVATAR, stored),
        ("docProps/app.xml", &b"<Properties>{fullName}</Properties>"[..], deflated),
    ];

    for (name, data, options) in parts {
        zip.start_file(name, options).unwrap();
        zip.write_all(data).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

pub fn zip_entries(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    (0..archive.len())
        .map(|i| {
            let mut file = archive.by_index(i).unwrap();
            let mut data = Vec::new();
            file.read_to_end(&mut data).unwrap();
            (file.name().to_string(), data)
        })
        .collect()
}

pub fn zip_text(bytes: &[u8], name: &str) -> String {
    let entry = zip_entries(bytes)
        .into_iter()
        .find(|(n, _)| n == name)
        .unwrap_or_else(|| panic!("missing entry {}", name));
    String::from_utf8(entry.1).unwrap()
}

pub fn zip_entry(bytes: &[u8], name: &str) -> Vec<u8> {
    zip_entries(bytes)
        .into_iter()
        .find(|(n, _)| n == name)
        .map(|(_, data)| data)
        .unwrap_or_else(|| panic!("missing entry {}", name))
}

fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

/// Profile with `certs` certifications and `projects` projects, newest first.
pub fn sample_profile(id: &str, certs: usize, projects: usize, has_avatar: bool) -> EmployeeProfile {
    EmployeeProfile {
        id: id.to_string(),
        full_name: format!("Employee {}", id),
        certifications: (0..certs)
            .map(|i| Certification {
                code: format!("C{}", i),
                name: format!("Cert {}", i),
                valid_from: format!("{}", 2020 + i),
            })
            .collect(),
        projects: (0..projects)
            .map(|i| Project {
                role: format!("Role {}", i),
                domain: format!("Industry {}", i),
                name: format!("Project {}", i),
                start_date: date(&format!("{}-01-01", 2024 - i)),
            })
            .collect(),
        languages: vec![
            Language {
                description: "English".to_string(),
            },
            Language {
                description: "French".to_string(),
            },
        ],
        skills: vec![
            Skill {
                name: "Rust".to_string(),
            },
            Skill {
                name: "SQL".to_string(),
            },
        ],
        has_avatar,
    }
}

#[derive(Clone, Default)]
pub struct InMemorySource {
    profiles: HashMap<String, EmployeeProfile>,
    avatars: HashMap<String, Vec<u8>>,
    template: Vec<u8>,
    pub template_loads: Arc<AtomicUsize>,
    pub avatar_requests: Arc<AtomicUsize>,
}

impl InMemorySource {
    pub fn new(template: Vec<u8>) -> Self {
        Self {
            template,
            ..Default::default()
        }
    }

    pub fn with_profile(mut self, profile: EmployeeProfile) -> Self {
        self.profiles.insert(profile.id.clone(), profile);
        self
    }

    pub fn with_avatar(mut self, id: &str, bytes: &[u8]) -> Self {
        self.avatars.insert(id.to_string(), bytes.to_vec());
        self
    }
}

#[async_trait]
impl ProfileSource for InMemorySource {
    async fn fetch_profile(&self, employee_id: &str) -> Result<EmployeeProfile> {
        self.profiles
            .get(employee_id)
            .cloned()
            .ok_or_else(|| OnePagerError::not_found(employee_id))
    }
}

#[async_trait]
impl AvatarSource for InMemorySource {
    async fn fetch_avatar(&self, employee_id: &str) -> Result<Option<Vec<u8>>> {
        self.avatar_requests.fetch_add(1, Ordering::SeqCst);
        Ok(self.avatars.get(employee_id).cloned())
    }
}

#[async_trait]
impl TemplateSource for InMemorySource {
    async fn load_template(&self) -> Result<Vec<u8>> {
        self.template_loads.fetch_add(1, Ordering::SeqCst);
        Ok(self.template.clone())
    }
}
