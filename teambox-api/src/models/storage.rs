use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One folder in the prefix-keyed storage listing. The key is a
/// slash-delimited path with a trailing `/`; the root key is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderRecord {
    pub key: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Listing of one prefix: direct subfolders plus the files directly under it.
#[derive(Debug, Deserialize)]
pub struct FileListing {
    #[serde(default)]
    pub folders: Vec<FolderRecord>,
    #[serde(default)]
    pub files: Vec<StoredFile>,
}

#[derive(Debug, Deserialize)]
pub struct FoldersPayload {
    pub folders: Vec<FolderRecord>,
}

#[derive(Debug, Deserialize)]
pub struct FolderPayload {
    pub folder: FolderRecord,
}

#[derive(Debug, Deserialize)]
pub struct UploadPayload {
    pub file: StoredFile,
}

#[derive(Debug, Deserialize)]
pub struct DownloadUrlPayload {
    pub url: String,
}
