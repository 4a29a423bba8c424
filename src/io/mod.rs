//! Audio file decoding, WAV encoding, and device playback.

pub mod decode;
pub mod encode;
pub mod play;

pub use decode::decode_file;
pub use encode::encode_file;
pub use play::{play, CancelToken};
