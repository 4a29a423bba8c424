//! Signal types, analysis windows, framing, and resampling primitives.

pub mod frame;
pub mod resample;
pub mod types;
pub mod window;
