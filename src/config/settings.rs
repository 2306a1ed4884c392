use crate::utils::error::{AnipeError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "anipe.toml";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_BUCKET: &str = "windsurf-anipe-data";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AnipeConfig {
    pub gemini: GeminiSettings,
    pub storage: StorageSettings,
    pub social: SocialSettings,
    pub server: ServerSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiSettings {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            timeout_seconds: 60,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Local,
    S3,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    pub output_path: String,
    pub bucket: String,
    pub region: String,
    /// S3 相容服務（MinIO、GCS interop）的端點
    pub endpoint_url: Option<String>,
    pub public_base_url: Option<String>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Local,
            output_path: "./output".to_string(),
            bucket: DEFAULT_BUCKET.to_string(),
            region: "us-east-1".to_string(),
            endpoint_url: None,
            public_base_url: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialSettings {
    pub twitter_bearer_token: Option<String>,
    pub linkedin_access_token: Option<String>,
    pub linkedin_author: String,
    pub twitter_base_url: String,
    pub linkedin_base_url: String,
}

impl Default for SocialSettings {
    fn default() -> Self {
        Self {
            twitter_bearer_token: None,
            linkedin_access_token: None,
            linkedin_author: "urn:li:person:YOUR_PERSON_ID".to_string(),
            twitter_base_url: "https://api.twitter.com".to_string(),
            linkedin_base_url: "https://api.linkedin.com".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl AnipeConfig {
    /// 載入順序：指定檔案 > ./anipe.toml > 預設值，最後套用環境變數
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(DEFAULT_CONFIG_FILE)?
            }
            None => Self::default(),
        };
        config.apply_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AnipeError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content);

        let mut config: Self =
            toml::from_str(&processed_content).map_err(|e| AnipeError::ConfigError {
                message: format!("TOML parsing error: {}", e),
            })?;
        config.normalize_secrets();
        Ok(config)
    }

    /// Applies environment overrides. `lookup` is injectable so tests do not touch the process env.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = get("GEMINI_API_KEY") {
            self.gemini.api_key = Some(key);
        }
        if let Some(model) = get("GEMINI_MODEL") {
            self.gemini.model = model;
        }
        if let Some(base_url) = get("GEMINI_BASE_URL") {
            self.gemini.base_url = base_url;
        }
        if let Some(backend) = get("STORAGE_BACKEND") {
            match backend.to_ascii_lowercase().as_str() {
                "s3" => self.storage.backend = StorageBackend::S3,
                "local" => self.storage.backend = StorageBackend::Local,
                other => tracing::warn!("Ignoring unknown STORAGE_BACKEND '{}'", other),
            }
        }
        if let Some(bucket) = get("S3_BUCKET").or_else(|| get("GCS_BUCKET_NAME")) {
            self.storage.bucket = bucket;
        }
        if let Some(region) = get("S3_REGION") {
            self.storage.region = region;
        }
        if let Some(endpoint) = get("S3_ENDPOINT_URL") {
            self.storage.endpoint_url = Some(endpoint);
        }
        if let Some(output_path) = get("OUTPUT_PATH") {
            self.storage.output_path = output_path;
        }
        if let Some(token) = get("TWITTER_BEARER_TOKEN") {
            self.social.twitter_bearer_token = Some(token);
        }
        if let Some(token) = get("LINKEDIN_ACCESS_TOKEN") {
            self.social.linkedin_access_token = Some(token);
        }
        if let Some(port) = get("PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("Ignoring non-numeric PORT '{}'", port),
            }
        }

        self.normalize_secrets();
    }

    // 未解析的 ${VAR} 或空字串視為未設定
    fn normalize_secrets(&mut self) {
        fn clean(value: &mut Option<String>) {
            if value
                .as_deref()
                .map(|v| v.trim().is_empty() || v.starts_with("${"))
                .unwrap_or(false)
            {
                *value = None;
            }
        }
        clean(&mut self.gemini.api_key);
        clean(&mut self.social.twitter_bearer_token);
        clean(&mut self.social.linkedin_access_token);
        clean(&mut self.storage.endpoint_url);
        clean(&mut self.storage.public_base_url);
    }
}

/// 替換環境變數 (例如 ${GEMINI_API_KEY})，找不到的保持原樣
fn substitute_env_vars(content: &str) -> String {
    use regex::Regex;
    use std::sync::OnceLock;

    static ENV_VAR: OnceLock<Regex> = OnceLock::new();
    let re = ENV_VAR.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"));

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    })
    .to_string()
}

impl Validate for AnipeConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("gemini.model", &self.gemini.model)?;
        validation::validate_url("gemini.base_url", &self.gemini.base_url)?;
        validation::validate_range("gemini.timeout_seconds", self.gemini.timeout_seconds, 1, 600)?;

        match self.storage.backend {
            StorageBackend::Local => {
                validation::validate_path("storage.output_path", &self.storage.output_path)?;
            }
            StorageBackend::S3 => {
                validation::validate_bucket_name("storage.bucket", &self.storage.bucket)?;
                validation::validate_region("storage.region", &self.storage.region)?;
                if let Some(endpoint) = &self.storage.endpoint_url {
                    validation::validate_url("storage.endpoint_url", endpoint)?;
                }
            }
        }
        if let Some(public_base_url) = &self.storage.public_base_url {
            validation::validate_url("storage.public_base_url", public_base_url)?;
        }

        validation::validate_url("social.twitter_base_url", &self.social.twitter_base_url)?;
        validation::validate_url("social.linkedin_base_url", &self.social.linkedin_base_url)?;
        validation::validate_range("server.port", self.server.port, 1, u16::MAX)?;

        tracing::debug!("Configuration validation passed");
        Ok(())
    }
}
