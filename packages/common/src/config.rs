use std::path::PathBuf;

use serde::Deserialize;

/// Which storage backend serves uploaded images.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Filesystem,
    S3,
}

/// Local directory backend settings.
#[derive(Debug, Deserialize, Clone)]
pub struct FilesystemStorageConfig {
    /// Directory objects are written to. Default: "./data/images".
    #[serde(default = "default_filesystem_root")]
    pub root: PathBuf,
}

impl Default for FilesystemStorageConfig {
    fn default() -> Self {
        Self {
            root: default_filesystem_root(),
        }
    }
}

/// S3-compatible backend settings.
#[derive(Debug, Deserialize, Clone)]
pub struct S3StorageConfig {
    pub bucket: String,
    /// Default: "us-east-1".
    #[serde(default = "default_s3_region")]
    pub region: String,
    /// Custom endpoint for MinIO, R2 and friends. `None` means AWS.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Falls back to the usual AWS environment/profile lookup when unset.
    #[serde(default)]
    pub access_key: Option<String>,
    #[serde(default)]
    pub secret_key: Option<String>,
    #[serde(default)]
    pub path_style: bool,
}

/// App-level storage configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// Base URL that object ids are appended to. Default: "http://127.0.0.1:3000/files".
    #[serde(default = "default_public_url")]
    pub public_url: String,
    /// Largest accepted object in bytes. Default: 10 MiB.
    #[serde(default = "default_max_object_size")]
    pub max_object_size: u64,
    #[serde(default)]
    pub filesystem: FilesystemStorageConfig,
    #[serde(default)]
    pub s3: Option<S3StorageConfig>,
}

fn default_filesystem_root() -> PathBuf {
    PathBuf::from("./data/images")
}
fn default_s3_region() -> String {
    "us-east-1".into()
}
fn default_public_url() -> String {
    "http://127.0.0.1:3000/files".into()
}
fn default_max_object_size() -> u64 {
    10 * 1024 * 1024
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            public_url: default_public_url(),
            max_object_size: default_max_object_size(),
            filesystem: FilesystemStorageConfig::default(),
            s3: None,
        }
    }
}
