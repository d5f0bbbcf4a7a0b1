pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliArgs;

pub use adapters::{RealEstateClient, RecruitmentClient, YouthPolicyClient};
pub use app::Report;
pub use config::AppConfig;
pub use crate::core::aggregate::{AggregateOptions, Aggregator};
pub use crate::core::intent::IntentClassifier;
pub use crate::core::region::RegionRegistry;
pub use utils::error::{IeumError, Result};
