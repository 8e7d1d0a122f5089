use serde::Deserialize;

/// Configuration options of the product adder service.
#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    /// Interface the HTTP server binds to.
    pub address: String,
    pub port: u16,
    /// SQLite database path holding the document store.
    pub database_url: String,
    /// Glob of the tera templates.
    pub templates_dir: String,
    /// Secret used to sign flash message cookies. Needs at least 64 bytes.
    pub secret: String,
    /// Upper bound for a whole multipart submission, in bytes.
    pub max_upload_bytes: usize,
    pub storage: StorageConfig,
}

impl ServerConfig {
    pub fn bind_address(&self) -> (String, u16) {
        (self.address.clone(), self.port)
    }
}

/// Blob storage backend selection.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum StorageConfig {
    /// Files below `root`, served by the application at `public_url`.
    Local { root: String, public_url: String },
    /// An S3 bucket, optionally on an S3-compatible endpoint.
    S3 {
        bucket: String,
        #[serde(default)]
        region: Option<String>,
        #[serde(default)]
        endpoint_url: Option<String>,
        #[serde(default)]
        public_url: Option<String>,
        #[serde(default = "default_presign_ttl_secs")]
        presign_ttl_secs: u64,
    },
}

fn default_presign_ttl_secs() -> u64 {
    24 * 60 * 60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_local_storage() {
        let config: StorageConfig = serde_json::from_value(serde_json::json!({
            "backend": "local",
            "root": "./media",
            "public_url": "http://localhost:8080/media",
        }))
        .unwrap();

        assert_eq!(
            config,
            StorageConfig::Local {
                root: "./media".into(),
                public_url: "http://localhost:8080/media".into(),
            }
        );
    }

    #[test]
    fn s3_storage_defaults_optional_fields() {
        let config: StorageConfig = serde_json::from_value(serde_json::json!({
            "backend": "s3",
            "bucket": "products",
        }))
        .unwrap();

        assert_eq!(
            config,
            StorageConfig::S3 {
                bucket: "products".into(),
                region: None,
                endpoint_url: None,
                public_url: None,
                presign_ttl_secs: 86400,
            }
        );
    }
}
