use s3::creds::Credentials;
use s3::{Bucket, Region};

const LOGO_CONTENT_TYPE: &str = "image/png";

/// Client for S3-compatible object storage holding generated logos.
///
/// The bucket is expected to be publicly served under `public_url_base`
/// (e.g. an R2 public bucket domain or a CDN in front of it), which stands in
/// for per-object public ACLs.
pub struct StorageClient {
    bucket: Box<Bucket>,
    public_url_base: String,
}

impl StorageClient {
    pub fn new(
        bucket_name: &str,
        endpoint: &str,
        access_key: &str,
        secret_key: &str,
        public_url_base: &str,
    ) -> Result<Self, StorageError> {
        let region = Region::Custom {
            region: "auto".to_string(),
            endpoint: endpoint.to_string(),
        };

        let credentials = Credentials::new(Some(access_key), Some(secret_key), None, None, None)
            .map_err(|e| StorageError::Config(e.to_string()))?;

        let bucket = Bucket::new(bucket_name, region, credentials)
            .map_err(|e| StorageError::Config(e.to_string()))?;

        Ok(Self {
            bucket,
            public_url_base: public_url_base.trim_end_matches('/').to_string(),
        })
    }

    /// Upload a re-encoded PNG logo. One write per job; re-delivered jobs
    /// simply overwrite the same key.
    pub async fn upload_logo(&self, key: &str, data: &[u8]) -> Result<(), StorageError> {
        self.bucket
            .put_object_with_content_type(key, data, LOGO_CONTENT_TYPE)
            .await
            .map_err(StorageError::S3)?;
        Ok(())
    }

    /// Download a stored logo (used by integration tests and tooling).
    pub async fn download(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let response = self.bucket.get_object(key).await.map_err(StorageError::S3)?;
        Ok(response.to_vec())
    }

    /// Delete an object.
    pub async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.bucket.delete_object(key).await.map_err(StorageError::S3)?;
        Ok(())
    }

    /// Public URL under which an uploaded object is reachable.
    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_url_base, key.trim_start_matches('/'))
    }
}

/// Storage key for a generated logo, partitioned by user.
pub fn logo_key(user_id: &str, job_id: uuid::Uuid) -> String {
    format!("generated_logos/{user_id}/{job_id}.png")
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("S3 operation failed: {0}")]
    S3(#[from] s3::error::S3Error),

    #[error("Storage configuration error: {0}")]
    Config(String),
}
