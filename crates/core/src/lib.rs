//! # StyleCraft Core
//!
//! Domain types, traits, and error definitions for the StyleCraft
//! style-transformation service. This crate has **zero framework
//! dependencies**; it defines the domain model that all other crates
//! implement against.
//!
//! The model backend and the record store are traits here; implementations
//! live in `stylecraft-providers` and `stylecraft-store`.

pub mod error;
pub mod model;
pub mod record;
pub mod store;
pub mod style;

pub use error::{ErrorKind, ModelError, NormalizationError, StorageError, TransformError};
pub use model::ModelClient;
pub use record::{
    HistoryEntry, HistoryPage, RecordId, TransformationRequest, TransformationResult,
};
pub use store::RecordStore;
pub use style::{ParseStyleError, Style};
