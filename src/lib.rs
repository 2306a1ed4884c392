pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

pub use config::local::LocalStorage;
pub use config::settings::AnipeConfig;
#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};
#[cfg(feature = "s3")]
pub use config::s3::S3Storage;

pub use core::context::ServiceContext;
pub use core::engine::{AnipeEngine, WorkflowReport};
pub use domain::model::Opportunity;
pub use server::ServiceKind;
pub use utils::error::{AnipeError, Result};
