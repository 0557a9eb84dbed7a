use async_trait::async_trait;

/// Where task attachments and submission files end up.
#[async_trait]
pub trait FileStorageInterface {
    /// Stores `bytes` as `path/file_name` and returns the public url.
    async fn upload(
        &self,
        bytes: Vec<u8>,
        path: Option<&str>,
        file_name: &str,
        content_type: Option<&str>,
    ) -> Result<String, String>;

    /// Used to roll back stored files when the owning record was not written.
    async fn delete(&self, path: Option<&str>, file_name: &str) -> Result<(), String>;
}
