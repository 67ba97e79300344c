//! The daily refresh pipeline.
//!
//! [`RefreshOrchestrator`] resolves a location, works out the local day,
//! consults the [`UpdateCache`](birdday_cache::UpdateCache), and only then
//! asks the [`BirdSelector`] for a bird and the [`ContentPublisher`] to push
//! it to the card.

pub mod bird;
pub mod error;
mod http;
pub mod orchestrator;
pub mod publisher;
pub mod selector;
pub mod wiring;

pub use bird::BirdDescriptor;
pub use error::{CollaboratorError, RefreshError};
pub use orchestrator::{
    FailedStage, RefreshOrchestrator, RefreshOutcome, RefreshRequest, RefreshSettings,
    RefreshStatus,
};
pub use publisher::{ContentPublisher, HttpContentPublisher};
pub use selector::{BirdSelector, HttpBirdSelector};
pub use wiring::{build_cascade, build_components, BuildError, Components};
