pub mod error;
pub mod validation;
pub mod formats;
pub mod stats;

pub use error::{CompressorError, CompressorResult};
pub use validation::{validate_config, validate_request};
pub use formats::ImageFormat;
pub use stats::{compression_ratio, format_file_size};
