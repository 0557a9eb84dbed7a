use uuid::Uuid;

use crate::entities::file_meta::FileMeta;
use crate::interfaces::file_storage::FileStorageInterface;
use crate::middleware::error::{AppError, AppResult};

use super::convert::FileUpload;

pub const ALLOWED_EXTENSIONS: [&str; 11] = [
    "pdf", "doc", "docx", "txt", "png", "jpg", "jpeg", "gif", "zip", "csv", "xlsx",
];

#[derive(Debug, Clone, Copy)]
pub struct UploadFilter {
    max_size_bytes: u64,
    max_files: usize,
}

impl UploadFilter {
    pub fn new(max_size_mb: u64, max_files: usize) -> Self {
        Self {
            max_size_bytes: max_size_mb * 1024 * 1024,
            max_files,
        }
    }

    pub fn max_files(&self) -> usize {
        self.max_files
    }

    pub fn check(&self, file: &FileUpload) -> AppResult<()> {
        if !ALLOWED_EXTENSIONS.contains(&file.extension.as_str()) {
            return Err(AppError::InvalidFile {
                description: format!("File type .{} is not allowed", file.extension),
            });
        }
        if file.data.is_empty() {
            return Err(AppError::InvalidFile {
                description: format!("File {} is empty", file.file_name),
            });
        }
        if file.data.len() as u64 > self.max_size_bytes {
            return Err(AppError::InvalidFile {
                description: format!(
                    "File {} exceeds {} MB",
                    file.file_name,
                    self.max_size_bytes / 1024 / 1024
                ),
            });
        }
        Ok(())
    }

    pub fn check_all(&self, files: &[FileUpload], already_stored: usize) -> AppResult<()> {
        if files.len() + already_stored > self.max_files {
            return Err(AppError::InvalidFile {
                description: format!("At most {} files are allowed", self.max_files),
            });
        }
        files.iter().try_for_each(|file| self.check(file))
    }
}

/// Writes every file under `dir` with a unique name. Files already written are
/// removed again when one of them fails.
pub async fn store_uploads(
    storage: &(dyn FileStorageInterface + Send + Sync),
    dir: &str,
    files: Vec<FileUpload>,
) -> AppResult<Vec<FileMeta>> {
    let mut stored: Vec<FileMeta> = Vec::with_capacity(files.len());
    for file in files {
        let stored_name = format!("{}_{}", Uuid::new_v4(), file.file_name);
        let size = file.data.len() as u64;
        let result = storage
            .upload(
                file.data,
                Some(dir),
                &stored_name,
                file.content_type.as_deref(),
            )
            .await;

        match result {
            Ok(url) => stored.push(FileMeta {
                file_name: file.file_name,
                url,
                content_type: file.content_type,
                size,
            }),
            Err(e) => {
                remove_uploads(storage, dir, &stored).await;
                return Err(AppError::Generic { description: e });
            }
        }
    }
    Ok(stored)
}

pub async fn remove_uploads(
    storage: &(dyn FileStorageInterface + Send + Sync),
    dir: &str,
    files: &[FileMeta],
) {
    for file in files {
        if let Some(stored_name) = file.url.rsplit('/').next() {
            if let Err(e) = storage.delete(Some(dir), stored_name).await {
                tracing::warn!("could not remove upload {}: {e}", file.url);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(name: &str, ext: &str, size: usize) -> FileUpload {
        FileUpload {
            content_type: None,
            file_name: name.to_string(),
            data: vec![1; size],
            extension: ext.to_string(),
        }
    }

    #[test]
    fn rejects_disallowed_types() {
        let filter = UploadFilter::new(1, 5);
        assert!(filter.check(&upload("a.pdf", "pdf", 10)).is_ok());
        assert!(matches!(
            filter.check(&upload("a.exe", "exe", 10)),
            Err(AppError::InvalidFile { .. })
        ));
    }

    #[test]
    fn rejects_oversized_and_empty_files() {
        let filter = UploadFilter::new(1, 5);
        assert!(filter.check(&upload("a.txt", "txt", 1024 * 1024 + 1)).is_err());
        assert!(filter.check(&upload("a.txt", "txt", 0)).is_err());
    }

    #[test]
    fn counts_already_stored_files() {
        let filter = UploadFilter::new(1, 5);
        let files = vec![upload("a.txt", "txt", 1), upload("b.txt", "txt", 1)];
        assert!(filter.check_all(&files, 3).is_ok());
        assert!(filter.check_all(&files, 4).is_err());
    }
}
