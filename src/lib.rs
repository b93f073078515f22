pub mod config;
pub mod document;
pub mod entity;
pub mod error;
pub mod evacuation;
pub mod fetcher;
pub mod normalizer;
pub mod pipeline;
pub mod transform;

pub use entity::{Entity, EntityKind};
pub use error::{EchoError, Result};
pub use fetcher::{ResourceFetcher, SwapiClient};
pub use normalizer::Normalizer;
pub use pipeline::{uninhabited_planets, EchoBasePipeline, RunSummary};
