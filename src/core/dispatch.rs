use crate::core::packager::Package;

pub const PRESENTATION_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";
pub const ARCHIVE_CONTENT_TYPE: &str = "application/zip";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub content_type: String,
    pub filename: String,
    pub bytes: Vec<u8>,
    pub document_count: usize,
}

impl GenerationResult {
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }

    pub fn is_bundle(&self) -> bool {
        self.document_count > 1
    }
}

pub fn dispatch(package: Package, bundle_filename: &str) -> GenerationResult {
    let document_count = package.document_count();
    match package {
        Package::Single { document, filename } => GenerationResult {
            content_type: PRESENTATION_CONTENT_TYPE.to_string(),
            filename,
            bytes: document.bytes,
            document_count,
        },
        Package::Bundle { bytes, .. } => GenerationResult {
            content_type: ARCHIVE_CONTENT_TYPE.to_string(),
            filename: bundle_filename.to_string(),
            bytes,
            document_count,
        },
    }
}
