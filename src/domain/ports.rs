use crate::domain::model::SearchResult;
use crate::utils::error::{AnipeError, Result};
use async_trait::async_trait;
use std::path::{Component, Path};

/// 物件 key 只能是相對路徑，不得含 `..` 或絕對路徑
pub fn checked_key(key: &str) -> Result<&str> {
    let escapes_root = Path::new(key)
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes_root {
        return Err(AnipeError::InvalidStorageKey {
            key: key.to_string(),
        });
    }
    Ok(key)
}

#[async_trait]
pub trait Storage: Send + Sync {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>>;

    async fn write_file(&self, path: &str, data: &[u8], content_type: &str) -> Result<()>;

    /// Canonical location of `path`, e.g. `s3://bucket/key` or `file:///dir/key`.
    fn uri(&self, path: &str) -> String;

    /// Publicly reachable URL, when the backend serves objects over HTTP.
    fn public_url(&self, _path: &str) -> Option<String> {
        None
    }

    /// Maps a URI produced by this (or a sibling) backend back to an object key.
    fn key_from_uri(&self, uri: &str) -> String {
        if let Some(key) = uri.strip_prefix(&self.uri("")) {
            return key.to_string();
        }
        // 其他 scheme：去掉 scheme 與 bucket
        match uri.split_once("://") {
            Some((_, rest)) => rest
                .split_once('/')
                .map(|(_, key)| key.to_string())
                .unwrap_or_default(),
            None => uri.trim_start_matches('/').to_string(),
        }
    }
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// False when no credentials are available; callers skip straight to fallback content.
    fn is_configured(&self) -> bool;

    async fn generate(&self, prompt: &str) -> Result<String>;
}

pub trait SearchProvider: Send + Sync {
    fn search(&self, query: &str, num_results: usize) -> Vec<SearchResult>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_key() {
        assert_eq!(checked_key("products/report.md").unwrap(), "products/report.md");
        assert!(checked_key("./results/a.json").is_ok());
        assert!(checked_key("../secret.json").is_err());
        assert!(checked_key("opportunities/../../etc/passwd").is_err());
        assert!(checked_key("/etc/passwd").is_err());
    }
}
