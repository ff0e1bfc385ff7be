//! The decode → (optional resize) → encode pipeline.

mod decode;
mod encode;
mod resize;
mod service;

pub use decode::decode_image;
pub use encode::encode_image;
pub use resize::contain_dimensions;
pub use service::ImageTransformer;
