//! Presentation template handling.
//!
//! A `.pptx` is a zip package. The template is parsed once into an ordered list
//! of parts and every render writes a brand new package from it:
//! - slide parts (`ppt/slides/slideN.xml`) get literal `{token}` substitution
//! - the avatar media part is swapped wholesale when an image is supplied
//! - everything else is copied through unchanged

use crate::domain::model::{GeneratorSettings, PlaceholderMap};
use crate::utils::error::{OnePagerError, Result};
use std::io::{Cursor, Read, Write};
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::{CompressionMethod, ZipArchive};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplatePart {
    pub name: String,
    pub data: Vec<u8>,
    pub compression: CompressionMethod,
    pub is_dir: bool,
}

/// Parsed, read-only view of the template package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateContainer {
    parts: Vec<TemplatePart>,
}

impl TemplateContainer {
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| OnePagerError::template(format!("template is not a zip package: {}", e)))?;

        let mut parts = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let mut file = archive.by_index(i).map_err(|e| {
                OnePagerError::template(format!("cannot open template entry #{}: {}", i, e))
            })?;

            let mut data = Vec::with_capacity(file.size() as usize);
            if !file.is_dir() {
                file.read_to_end(&mut data).map_err(|e| {
                    OnePagerError::template(format!("cannot read '{}': {}", file.name(), e))
                })?;
            }

            parts.push(TemplatePart {
                name: file.name().to_string(),
                data,
                compression: file.compression(),
                is_dir: file.is_dir(),
            });
        }

        tracing::debug!("Parsed template with {} parts", parts.len());
        Ok(Self { parts })
    }

    pub fn parts(&self) -> &[TemplatePart] {
        &self.parts
    }

    pub fn part(&self, name: &str) -> Option<&TemplatePart> {
        self.parts.iter().find(|p| p.name == name)
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct TemplateRenderer {
    slide_prefix: String,
    avatar_part: String,
}

impl TemplateRenderer {
    /// The slide prefix is a directory, so a missing trailing `/` is added.
    pub fn new(slide_prefix: impl Into<String>, avatar_part: impl Into<String>) -> Self {
        let mut slide_prefix = slide_prefix.into();
        if !slide_prefix.is_empty() && !slide_prefix.ends_with('/') {
            slide_prefix.push('/');
        }
        Self {
            slide_prefix,
            avatar_part: avatar_part.into(),
        }
    }

    pub fn from_settings(settings: &GeneratorSettings) -> Self {
        Self::new(settings.slide_prefix.clone(), settings.avatar_part.clone())
    }

    /// `ppt/slides/slide1.xml` yes, `ppt/slides/_rels/slide1.xml.rels` no.
    pub fn is_slide_part(&self, name: &str) -> bool {
        name.strip_prefix(self.slide_prefix.as_str())
            .map(|rest| !rest.is_empty() && !rest.contains('/') && rest.ends_with(".xml"))
            .unwrap_or(false)
    }

    pub fn slide_parts<'a>(&'a self, template: &'a TemplateContainer) -> impl Iterator<Item = &'a TemplatePart> + 'a {
        template
            .parts()
            .iter()
            .filter(move |p| !p.is_dir && self.is_slide_part(&p.name))
    }

    /// A usable template has at least one slide and valid UTF-8 slide text.
    pub fn validate(&self, template: &TemplateContainer) -> Result<()> {
        let mut slides = 0;
        for part in self.slide_parts(template) {
            std::str::from_utf8(&part.data).map_err(|e| {
                OnePagerError::template(format!("slide '{}' is not UTF-8: {}", part.name, e))
            })?;
            slides += 1;
        }

        if slides == 0 {
            return Err(OnePagerError::template(format!(
                "template has no slide parts under '{}'",
                self.slide_prefix
            )));
        }
        Ok(())
    }

    pub fn render_bytes(
        &self,
        template_bytes: &[u8],
        placeholders: &PlaceholderMap,
        avatar: Option<&[u8]>,
    ) -> Result<Vec<u8>> {
        let template = TemplateContainer::parse(template_bytes)?;
        self.render(&template, placeholders, avatar)
    }

    pub fn render(
        &self,
        template: &TemplateContainer,
        placeholders: &PlaceholderMap,
        avatar: Option<&[u8]>,
    ) -> Result<Vec<u8>> {
        if avatar.is_some() && template.part(&self.avatar_part).is_none() {
            return Err(OnePagerError::template(format!(
                "template has no avatar part '{}'",
                self.avatar_part
            )));
        }

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

        for part in template.parts() {
            let options = SimpleFileOptions::default().compression_method(writable_method(part.compression));

            if part.is_dir {
                zip.add_directory(part.name.as_str(), options)?;
                continue;
            }

            zip.start_file(part.name.as_str(), options)?;

            match avatar {
                Some(image) if part.name == self.avatar_part => {
                    tracing::debug!("Replacing avatar part {} ({} bytes)", part.name, image.len());
                    zip.write_all(image)?;
                }
                _ if self.is_slide_part(&part.name) => {
                    let text = std::str::from_utf8(&part.data).map_err(|e| {
                        OnePagerError::template(format!("slide '{}' is not UTF-8: {}", part.name, e))
                    })?;
                    zip.write_all(substitute(text, placeholders).as_bytes())?;
                }
                _ => zip.write_all(&part.data)?,
            }
        }

        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }
}

/// Literal replacement of every token in one pass over the slide text; on a tie
/// the earlier map entry wins. Inserted values are never scanned again, so a
/// value that itself looks like `{skills}` stays as written. Values are
/// XML-escaped because slide text lives inside `<a:t>` elements.
pub fn substitute(text: &str, placeholders: &PlaceholderMap) -> String {
    let mut output = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find('{') {
        output.push_str(&rest[..start]);
        let candidate = &rest[start..];

        match placeholders
            .iter()
            .find(|(token, _)| candidate.starts_with(*token))
        {
            Some((token, value)) => {
                output.push_str(&escape_xml(value));
                rest = &candidate[token.len()..];
            }
            None => {
                output.push('{');
                rest = &candidate[1..];
            }
        }
    }
    output.push_str(rest);
    output
}

pub fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

// 只支援 stored/deflated，其他壓縮方式一律改以 deflate 寫出
fn writable_method(method: CompressionMethod) -> CompressionMethod {
    match method {
        CompressionMethod::Stored => CompressionMethod::Stored,
        _ => CompressionMethod::Deflated,
    }
}
