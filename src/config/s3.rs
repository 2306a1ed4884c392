use crate::config::settings::StorageSettings;
use crate::domain::ports::Storage;
use crate::utils::error::{AnipeError, Result};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::ProvideErrorMetadata;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;

#[derive(Debug, Clone)]
pub struct S3Storage {
    client: S3Client,
    bucket: String,
    region: String,
    public_base_url: Option<String>,
}

impl S3Storage {
    pub fn new(client: S3Client, bucket: String, region: String) -> Self {
        Self {
            client,
            bucket,
            region,
            public_base_url: None,
        }
    }

    pub fn with_public_base_url(mut self, public_base_url: Option<String>) -> Self {
        self.public_base_url = public_base_url;
        self
    }

    /// 由設定建立 S3 client（支援自訂 endpoint 的 S3 相容服務）
    pub async fn from_settings(settings: &StorageSettings) -> Self {
        let shared = aws_config::load_defaults(BehaviorVersion::latest()).await;
        let mut builder = aws_sdk_s3::config::Builder::from(&shared)
            .region(Region::new(settings.region.clone()));
        if let Some(endpoint) = &settings.endpoint_url {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }
        let client = S3Client::from_conf(builder.build());

        tracing::info!(
            "Using S3 storage bucket '{}' in {}",
            settings.bucket,
            settings.region
        );
        Self::new(client, settings.bucket.clone(), settings.region.clone())
            .with_public_base_url(settings.public_base_url.clone())
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let resp = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(path)
            .send()
            .await
            .map_err(|e| {
                let e = e.into_service_error();
                AnipeError::storage(format!(
                    "Failed to read s3://{}/{}: {}",
                    self.bucket,
                    path,
                    e.message().unwrap_or("unknown error")
                ))
            })?;

        let data = resp
            .body
            .collect()
            .await
            .map_err(|e| AnipeError::storage(format!("Failed to collect S3 data: {}", e)))?;

        Ok(data.into_bytes().to_vec())
    }

    async fn write_file(&self, path: &str, data: &[u8], content_type: &str) -> Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(path)
            .content_type(content_type)
            .body(ByteStream::from(data.to_vec()))
            .send()
            .await
            .map_err(|e| {
                let e = e.into_service_error();
                AnipeError::storage(format!(
                    "Failed to write s3://{}/{} ({}): {}",
                    self.bucket,
                    path,
                    e.code().unwrap_or("Unhandled"),
                    e.message().unwrap_or("unknown error")
                ))
            })?;

        tracing::debug!("Uploaded s3://{}/{}", self.bucket, path);
        Ok(())
    }

    fn uri(&self, path: &str) -> String {
        format!("s3://{}/{}", self.bucket, path)
    }

    fn public_url(&self, path: &str) -> Option<String> {
        match &self.public_base_url {
            Some(base) => Some(format!("{}/{}", base.trim_end_matches('/'), path)),
            None => Some(format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket, self.region, path
            )),
        }
    }
}
