use crate::domain::model::RenderedDocument;
use crate::utils::error::{OnePagerError, Result};
use std::io::{Cursor, Write};
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::CompressionMethod;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Package {
    Single {
        document: RenderedDocument,
        filename: String,
    },
    Bundle {
        bytes: Vec<u8>,
        entries: Vec<String>,
    },
}

impl Package {
    pub fn document_count(&self) -> usize {
        match self {
            Package::Single { .. } => 1,
            Package::Bundle { entries, .. } => entries.len(),
        }
    }
}

pub fn document_filename(employee_id: &str, extension: &str) -> String {
    format!("OP_{}.{}", employee_id, extension)
}

/// One document is passed through untouched; several are zipped in request order.
pub fn pack(mut documents: Vec<RenderedDocument>, extension: &str) -> Result<Package> {
    match documents.len() {
        0 => Err(OnePagerError::validation("no documents to package")),
        1 => {
            let document = documents.remove(0);
            let filename = document_filename(&document.employee_id, extension);
            Ok(Package::Single { document, filename })
        }
        count => {
            tracing::debug!("Bundling {} documents into one archive", count);

            // 文件本身已是壓縮過的 zip，直接 stored 存放
            let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
            let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
            let mut entries = Vec::with_capacity(count);

            for document in &documents {
                let name = document_filename(&document.employee_id, extension);
                zip.start_file(name.as_str(), options)?;
                zip.write_all(&document.bytes)?;
                entries.push(name);
            }

            let bytes = zip.finish()?.into_inner();
            Ok(Package::Bundle { bytes, entries })
        }
    }
}
