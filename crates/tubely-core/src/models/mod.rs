pub mod aspect;
pub mod video;

pub use aspect::AspectRatio;
pub use video::{Video, VideoResponse};
