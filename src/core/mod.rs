//! Core types and configuration.
//!
//! This module contains the fundamental types used throughout the crate:
//! - [`SourceImage`]: A source payload submitted for transformation
//! - [`TransformRequest`]: Settings for one transform call
//! - [`TransformResult`]: Result of a completed transform
//! - [`BatchItem`]: Per-source outcome of a batch transform
//! - [`TransformConfig`]: Service configuration

mod config;
mod types;

pub use config::{optimal_workers, TransformConfig, DEFAULT_MAX_DIMENSION, DEFAULT_MAX_OUTPUT_BYTES};
pub use types::{BatchItem, EntryStatus, SourceImage, TransformRequest, TransformResult, DEFAULT_QUALITY};
