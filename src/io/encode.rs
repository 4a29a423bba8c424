//! Writing a [`Signal`] out as a WAV file.

use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};

use crate::core::types::Signal;
use crate::error::{Result, TransformError};

/// Encodes a signal to the path, choosing the format from its extension.
///
/// `.wav` is the only supported output container; 16-bit PCM is the
/// default depth. Any other extension is rejected rather than silently
/// written as WAV under a misleading name.
pub fn encode_file(path: &Path, signal: &Signal) -> Result<()> {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("wav") => write_wav_16bit(path, signal),
        other => Err(TransformError::Encode {
            path: path.to_path_buf(),
            reason: match other {
                Some(ext) => format!("unsupported output format '.{ext}', expected .wav"),
                None => "output path has no file extension, expected .wav".into(),
            },
        }),
    }
}

/// Writes 16-bit integer PCM. Samples are clamped to [-1, 1] first.
pub fn write_wav_16bit(path: &Path, signal: &Signal) -> Result<()> {
    let encode_err = |reason: String| TransformError::Encode {
        path: path.to_path_buf(),
        reason,
    };

    let spec = WavSpec {
        channels: signal.channels,
        sample_rate: signal.sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer =
        WavWriter::create(path, spec).map_err(|e| encode_err(format!("create failed: {e}")))?;
    for &sample in &signal.data {
        let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer
            .write_sample(value)
            .map_err(|e| encode_err(format!("write failed: {e}")))?;
    }
    writer
        .finalize()
        .map_err(|e| encode_err(format!("finalize failed: {e}")))?;

    log::debug!(
        "wrote {}: {} frames, {} channel(s), {} Hz",
        path.display(),
        signal.num_frames(),
        signal.channels,
        signal.sample_rate
    );
    Ok(())
}

/// Writes 32-bit float PCM, preserving samples bit-exactly.
pub fn write_wav_float(path: &Path, signal: &Signal) -> Result<()> {
    let encode_err = |reason: String| TransformError::Encode {
        path: path.to_path_buf(),
        reason,
    };

    let spec = WavSpec {
        channels: signal.channels,
        sample_rate: signal.sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };

    let mut writer =
        WavWriter::create(path, spec).map_err(|e| encode_err(format!("create failed: {e}")))?;
    for &sample in &signal.data {
        writer
            .write_sample(sample)
            .map_err(|e| encode_err(format!("write failed: {e}")))?;
    }
    writer
        .finalize()
        .map_err(|e| encode_err(format!("finalize failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_signal() -> Signal {
        let data: Vec<f32> = (0..1000)
            .map(|i| (i as f32 * 0.05).sin() * 0.5)
            .collect();
        Signal::from_mono(data, 44100)
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let signal = test_signal();
        let err = encode_file(Path::new("/tmp/out.ogg"), &signal).unwrap_err();
        match err {
            TransformError::Encode { reason, .. } => {
                assert!(reason.contains("unsupported output format"));
            }
            other => panic!("expected encode error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_extension_rejected() {
        let signal = test_signal();
        assert!(matches!(
            encode_file(Path::new("/tmp/out"), &signal),
            Err(TransformError::Encode { .. })
        ));
    }

    #[test]
    fn test_wav_extension_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.WAV");
        encode_file(&path, &test_signal()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_16bit_roundtrip_via_hound() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.wav");
        let signal = test_signal();
        write_wav_16bit(&path, &signal).unwrap();

        let mut reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 44100);
        assert_eq!(spec.bits_per_sample, 16);

        let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(samples.len(), signal.data.len());
        for (wrote, read) in signal.data.iter().zip(samples.iter()) {
            let back = *read as f32 / i16::MAX as f32;
            assert!((wrote - back).abs() < 1.0 / 16384.0);
        }
    }

    #[test]
    fn test_float_roundtrip_bit_exact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.wav");
        let signal = test_signal();
        write_wav_float(&path, &signal).unwrap();

        let mut reader = hound::WavReader::open(&path).unwrap();
        let samples: Vec<f32> = reader.samples::<f32>().map(|s| s.unwrap()).collect();
        assert_eq!(samples, signal.data);
    }

    #[test]
    fn test_clipping_clamped_in_16bit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hot.wav");
        let signal = Signal::from_mono(vec![2.0, -2.0, 0.0], 44100);
        write_wav_16bit(&path, &signal).unwrap();

        let mut reader = hound::WavReader::open(&path).unwrap();
        let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(samples, vec![i16::MAX, -i16::MAX, 0]);
    }
}
