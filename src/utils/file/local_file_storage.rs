use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::interfaces::file_storage::FileStorageInterface;

pub struct LocalFileStorage {
    uploads_dir: String,
    upload_base_url: String,
}

impl LocalFileStorage {
    pub fn new(uploads_dir: String, upload_base_url: String) -> Self {
        LocalFileStorage {
            uploads_dir,
            upload_base_url,
        }
    }

    fn object_name(path: Option<&str>, file_name: &str) -> String {
        match path {
            Some(path) if !path.is_empty() => format!("{path}/{file_name}"),
            _ => file_name.to_string(),
        }
    }

    fn full_path(&self, object_name: &str) -> PathBuf {
        Path::new(&self.uploads_dir).join(object_name)
    }
}

#[async_trait]
impl FileStorageInterface for LocalFileStorage {
    async fn upload(
        &self,
        bytes: Vec<u8>,
        path: Option<&str>,
        file_name: &str,
        _: Option<&str>,
    ) -> Result<String, String> {
        let object_name = Self::object_name(path, file_name);
        let full_path = self.full_path(&object_name);
        if let Some(dir) = full_path.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| e.to_string())?;
        }
        tokio::fs::write(&full_path, bytes)
            .await
            .map_err(|e| e.to_string())?;

        tracing::debug!("stored upload {}", full_path.display());
        Ok(format!("{}/{}", self.upload_base_url, object_name))
    }

    async fn delete(&self, path: Option<&str>, file_name: &str) -> Result<(), String> {
        let full_path = self.full_path(&Self::object_name(path, file_name));
        tokio::fs::remove_file(full_path)
            .await
            .map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upload_then_delete() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(
            dir.path().to_string_lossy().to_string(),
            "/uploads".to_string(),
        );
        let url = storage
            .upload(b"hello".to_vec(), Some("tasks/abc"), "a.txt", None)
            .await
            .unwrap();
        assert_eq!(url, "/uploads/tasks/abc/a.txt");
        assert!(dir.path().join("tasks/abc/a.txt").exists());

        storage.delete(Some("tasks/abc"), "a.txt").await.unwrap();
        assert!(!dir.path().join("tasks/abc/a.txt").exists());
    }
}
