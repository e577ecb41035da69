pub mod config;
pub mod crop;
pub mod engine;
pub mod error;
pub mod farm;
pub mod rng;
pub mod runtime;
pub mod snapshot;
pub mod systems;
pub mod weather;
pub mod web;

pub use config::{ConfigLoader, FarmConfig};
pub use engine::{Engine, EngineBuilder, EngineSettings};
pub use error::FarmError;
pub use farm::{ClickOutcome, Farm, Plot};
pub use runtime::{FarmClient, FarmHandle, FarmRuntime};
pub use snapshot::FarmSnapshot;
