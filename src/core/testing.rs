use crate::domain::ports::Storage;
use crate::utils::error::{AnipeError, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Mutex;

/// In-memory storage for unit tests.
#[derive(Default)]
pub(crate) struct MemoryStorage {
    files: Mutex<BTreeMap<String, (Vec<u8>, String)>>,
    fail_writes: bool,
}

impl MemoryStorage {
    pub(crate) fn failing() -> Self {
        Self {
            files: Mutex::new(BTreeMap::new()),
            fail_writes: true,
        }
    }

    pub(crate) fn keys(&self) -> Vec<String> {
        self.files.lock().unwrap().keys().cloned().collect()
    }

    pub(crate) fn get(&self, path: &str) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(path).map(|(data, _)| data.clone())
    }

    pub(crate) fn get_string(&self, path: &str) -> Option<String> {
        self.get(path).map(|data| String::from_utf8(data).unwrap())
    }

    pub(crate) fn content_type(&self, path: &str) -> Option<String> {
        self.files.lock().unwrap().get(path).map(|(_, ct)| ct.clone())
    }

    pub(crate) fn key_with_prefix(&self, prefix: &str) -> Option<String> {
        self.keys().into_iter().find(|k| k.starts_with(prefix))
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        self.get(path).ok_or_else(|| {
            AnipeError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("File not found: {}", path),
            ))
        })
    }

    async fn write_file(&self, path: &str, data: &[u8], content_type: &str) -> Result<()> {
        if self.fail_writes {
            return Err(AnipeError::storage(format!("write rejected: {}", path)));
        }
        self.files
            .lock()
            .unwrap()
            .insert(path.to_string(), (data.to_vec(), content_type.to_string()));
        Ok(())
    }

    fn uri(&self, path: &str) -> String {
        format!("mem://{}", path)
    }

    fn public_url(&self, path: &str) -> Option<String> {
        Some(format!("https://cdn.example.com/{}", path))
    }
}
