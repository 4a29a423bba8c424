//! The transformation stages and the pipeline that sequences them.

pub mod normalize;
pub mod pipeline;
pub mod pitch;
pub mod vocoder;

pub use normalize::{LevelMode, DEFAULT_TARGET_LEVEL};
pub use pipeline::process;
pub use pitch::{pitch_shift_channel, semitone_ratio};
pub use vocoder::PhaseVocoder;
