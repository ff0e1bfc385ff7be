// Module declarations in dependency order
pub mod utils;
pub mod core;
pub mod transform;
pub mod handle;
pub mod intake;
pub mod export;
pub mod session;
pub mod report;

// Public exports for external consumers
pub use crate::core::{
    BatchItem, EntryStatus, SourceImage, TransformConfig, TransformRequest, TransformResult,
};
pub use crate::export::{ExportItem, ExportOptions, export_results};
pub use crate::handle::{DisplayHandle, HandleRegistry};
pub use crate::report::BatchSummary;
pub use crate::session::CompressionSession;
pub use crate::transform::ImageTransformer;
pub use crate::utils::{CompressorError, CompressorResult, ImageFormat};

// This library file is used as a public API for consuming this crate as a library.
// The actual application entry point is in main.rs.
