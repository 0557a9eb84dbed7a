use std::io::Read;

use axum_typed_multipart::FieldData;
use tempfile::NamedTempFile;

use crate::middleware::error::{AppError, AppResult};

pub fn sanitize_filename(file_name: &str) -> String {
    let bad_chars = ['/', '\\', ':', '*', '?', '"', '<', '>', '|', ' '];
    let mut result = file_name.trim().to_owned();
    for &ch in &bad_chars {
        result = result.replace(ch, "_");
    }
    result
}

#[derive(Debug)]
pub struct FileUpload {
    pub content_type: Option<String>,
    pub file_name: String,
    pub data: Vec<u8>,
    pub extension: String,
}

pub fn convert_field_file_data(data: FieldData<NamedTempFile>) -> AppResult<FileUpload> {
    let content_type = data.metadata.content_type;

    let file_name = data
        .metadata
        .file_name
        .filter(|name| !name.trim().is_empty())
        .ok_or(AppError::InvalidFile {
            description: "File name missing".to_string(),
        })?;

    let extension = match file_name.rsplit_once(".") {
        Some((_, ext)) if !ext.is_empty() => ext.to_lowercase(),
        _ => {
            return Err(AppError::InvalidFile {
                description: format!("File {file_name} has no extension"),
            })
        }
    };

    let mut buffer = Vec::new();
    let mut file = data.contents.as_file();

    file.read_to_end(&mut buffer)
        .map_err(|e| AppError::InvalidFile {
            description: e.to_string(),
        })?;
    Ok(FileUpload {
        content_type,
        file_name: sanitize_filename(&file_name),
        data: buffer,
        extension,
    })
}

#[cfg(test)]
mod tests {
    use super::sanitize_filename;

    #[test]
    fn strips_path_characters() {
        assert_eq!(sanitize_filename("../etc/pass wd.txt"), ".._etc_pass_wd.txt");
        assert_eq!(sanitize_filename("report.pdf"), "report.pdf");
    }
}
