use std::path::Path;

use async_trait::async_trait;
use reqwest::multipart;

use crate::api::BackendClient;
use crate::error::ApiError;
use crate::http::Ack;
use crate::models::{
    DownloadUrlPayload, FileListing, FolderPayload, FolderRecord, FoldersPayload, StoredFile,
    UploadPayload,
};

#[async_trait]
pub trait StorageApi {
    async fn list_files(&self, prefix: &str) -> Result<FileListing, ApiError>;
    async fn upload_file(&self, path: &Path, prefix: &str) -> Result<StoredFile, ApiError>;
    async fn create_folder(&self, parent_prefix: &str, name: &str) -> Result<FolderRecord, ApiError>;
    async fn delete_file(&self, key: &str) -> Result<(), ApiError>;
    async fn delete_folder(&self, key: &str) -> Result<(), ApiError>;
    async fn rename(&self, key: &str, name: &str) -> Result<(), ApiError>;
    /// Move a file under another folder prefix.
    async fn move_file(&self, key: &str, destination: &str) -> Result<(), ApiError>;
    /// Flat, prefix-keyed listing of every folder the company owns.
    async fn get_folders(&self) -> Result<Vec<FolderRecord>, ApiError>;
    /// Presigned, short-lived download URL for one key.
    async fn download_url(&self, key: &str) -> Result<String, ApiError>;
}

#[async_trait]
impl StorageApi for BackendClient {
    async fn list_files(&self, prefix: &str) -> Result<FileListing, ApiError> {
        self.http
            .get("/storage/files", &[("prefix", prefix)])
            .await
    }

    async fn upload_file(&self, path: &Path, prefix: &str) -> Result<StoredFile, ApiError> {
        let file_name = path
            .file_name()
            .ok_or_else(|| ApiError::Validation("invalid file path".to_string()))?
            .to_string_lossy();

        let file_part = multipart::Part::file(path)
            .await?
            .file_name(file_name.to_string());

        let form = multipart::Form::new()
            .text("prefix", prefix.to_string())
            .part("file", file_part);

        let payload: UploadPayload = self.http.post_multipart("/storage/files", form).await?;
        Ok(payload.file)
    }

    async fn create_folder(
        &self,
        parent_prefix: &str,
        name: &str,
    ) -> Result<FolderRecord, ApiError> {
        if name.trim().is_empty() || name.contains('/') {
            return Err(ApiError::Validation(
                "folder name must be non-empty and must not contain '/'".to_string(),
            ));
        }

        let payload: FolderPayload = self
            .http
            .post(
                "/storage/folders",
                &serde_json::json!({ "prefix": parent_prefix, "name": name }),
            )
            .await?;
        Ok(payload.folder)
    }

    async fn delete_file(&self, key: &str) -> Result<(), ApiError> {
        let _: Ack = self.http.delete("/storage/files", &[("key", key)]).await?;
        Ok(())
    }

    async fn delete_folder(&self, key: &str) -> Result<(), ApiError> {
        let _: Ack = self
            .http
            .delete("/storage/folders", &[("key", key)])
            .await?;
        Ok(())
    }

    async fn rename(&self, key: &str, name: &str) -> Result<(), ApiError> {
        if name.trim().is_empty() {
            return Err(ApiError::Validation("name must not be empty".to_string()));
        }

        let _: Ack = self
            .http
            .post(
                "/storage/rename",
                &serde_json::json!({ "key": key, "name": name }),
            )
            .await?;
        Ok(())
    }

    async fn move_file(&self, key: &str, destination: &str) -> Result<(), ApiError> {
        let _: Ack = self
            .http
            .post(
                "/storage/move",
                &serde_json::json!({ "key": key, "destination": destination }),
            )
            .await?;
        Ok(())
    }

    async fn get_folders(&self) -> Result<Vec<FolderRecord>, ApiError> {
        let payload: FoldersPayload = self.http.get("/storage/folders", &[]).await?;
        Ok(payload.folders)
    }

    async fn download_url(&self, key: &str) -> Result<String, ApiError> {
        let payload: DownloadUrlPayload = self
            .http
            .get("/storage/download-url", &[("key", key)])
            .await?;
        Ok(payload.url)
    }
}
