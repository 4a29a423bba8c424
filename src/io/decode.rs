//! Decoding compressed audio files into an in-memory [`Signal`].
//!
//! Container and codec detection is delegated to symphonia's probe, so
//! anything the enabled codec features cover (WAV, MP3, AAC/M4A, FLAC,
//! Vorbis) decodes through the same path. All sample formats are converted
//! to interleaved `f32` and the source channel count is kept as-is.

use std::fs::File;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::core::types::Signal;
use crate::error::{Result, TransformError};

/// Decodes an audio file into an interleaved f32 signal.
pub fn decode_file(path: &Path) -> Result<Signal> {
    let decode_err = |reason: String| TransformError::Decode {
        path: path.to_path_buf(),
        reason,
    };

    let file = File::open(path).map_err(|e| decode_err(format!("failed to open file: {e}")))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| decode_err(format!("unrecognized format: {e}")))?;

    let mut format = probed.format;

    let track = format
        .default_track()
        .ok_or_else(|| decode_err("no audio track found".into()))?;
    let track_id = track.id;
    let codec_params = track.codec_params.clone();

    let sample_rate = codec_params
        .sample_rate
        .ok_or_else(|| decode_err("unknown sample rate".into()))?;
    let channels = codec_params
        .channels
        .map(|c| c.count())
        .ok_or_else(|| decode_err("unknown channel layout".into()))?;
    if channels == 0 || channels > u16::MAX as usize {
        return Err(decode_err(format!("unsupported channel count {channels}")));
    }

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|e| decode_err(format!("no decoder for codec: {e}")))?;

    let mut data: Vec<f32> = Vec::new();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(SymphoniaError::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(decode_err(format!("error reading packet: {e}"))),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            // Recoverable corruption: skip the packet, keep going.
            Err(SymphoniaError::DecodeError(e)) => {
                log::warn!("skipping corrupt packet: {e}");
                continue;
            }
            Err(e) => return Err(decode_err(format!("decode error: {e}"))),
        };

        let buf = sample_buf.get_or_insert_with(|| {
            SampleBuffer::new(decoded.capacity() as u64, *decoded.spec())
        });
        buf.copy_interleaved_ref(decoded);
        data.extend_from_slice(buf.samples());
    }

    if data.is_empty() {
        return Err(decode_err("file contains no audio samples".into()));
    }

    log::debug!(
        "decoded {}: {} frames, {} channel(s), {} Hz",
        path.display(),
        data.len() / channels,
        channels,
        sample_rate
    );

    Signal::new(data, channels as u16, sample_rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_decode_error() {
        let err = decode_file(Path::new("/nonexistent/audio.wav")).unwrap_err();
        match err {
            TransformError::Decode { path, reason } => {
                assert_eq!(path, Path::new("/nonexistent/audio.wav"));
                assert!(reason.contains("failed to open"));
            }
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn test_garbage_bytes_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("noise.mp3");
        std::fs::write(&path, b"this is not an audio file at all").unwrap();
        assert!(matches!(
            decode_file(&path),
            Err(TransformError::Decode { .. })
        ));
    }
}
