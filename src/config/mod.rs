pub mod local;
#[cfg(feature = "s3")]
pub mod s3;
pub mod settings;

use crate::core::context::ServiceContext;
use crate::core::generator::GeminiClient;
use crate::core::search::SimulatedSearch;
use crate::core::social::SocialPoster;
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use local::LocalStorage;
use settings::{AnipeConfig, StorageBackend, StorageSettings};
use std::sync::Arc;

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

/// 依設定建立儲存後端
pub async fn build_storage(settings: &StorageSettings) -> Result<Arc<dyn Storage>> {
    match settings.backend {
        StorageBackend::Local => {
            tracing::debug!("Using local storage at {}", settings.output_path);
            Ok(Arc::new(LocalStorage::new(settings.output_path.clone())))
        }
        #[cfg(feature = "s3")]
        StorageBackend::S3 => {
            tracing::debug!("Using S3 bucket {}", settings.bucket);
            Ok(Arc::new(s3::S3Storage::from_settings(settings).await))
        }
        #[cfg(not(feature = "s3"))]
        StorageBackend::S3 => Err(crate::utils::error::AnipeError::ConfigError {
            message: "storage.backend = \"s3\" requires building with the `s3` feature"
                .to_string(),
        }),
    }
}

pub async fn build_context(config: &AnipeConfig) -> Result<ServiceContext> {
    let storage = build_storage(&config.storage).await?;
    let generator = GeminiClient::new(&config.gemini)?;
    Ok(ServiceContext::new(
        storage,
        Arc::new(generator),
        Arc::new(SimulatedSearch),
        Arc::new(SocialPoster::from_settings(&config.social)),
    ))
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "anipe")]
#[command(about = "Autonomous niche income pipeline: opportunities, products, sales pages and promotion")]
pub struct CliConfig {
    #[command(subcommand)]
    pub command: Command,

    /// Directory for generated files (overrides storage.output_path)
    #[arg(long, global = true, env = "OUTPUT_PATH")]
    pub output_path: Option<String>,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Build a complete income strategy and save it as JSON
    Strategy,
    /// Generate a ready-to-publish content package
    Content {
        #[arg(long, default_value = "PASSIVE_INCOME")]
        niche: String,
        /// Also write content_package.zip
        #[arg(long)]
        bundle: bool,
    },
    /// Write setup guides, resources and income projections
    Launch,
    /// Identify and store one niche opportunity
    Identify {
        #[arg(long)]
        query: Option<String>,
    },
    /// Run the whole opportunity-to-promotion workflow
    Workflow {
        #[arg(long)]
        query: Option<String>,
    },
    /// Check that the configured Gemini API key works
    CheckKey,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Loads the TOML/env settings and applies command-line overrides.
    pub fn settings(&self) -> Result<AnipeConfig> {
        let mut config = AnipeConfig::load(self.config.as_deref())?;
        if let Some(output_path) = &self.output_path {
            config.storage.output_path = output_path.clone();
        }
        Ok(config)
    }
}
