//! Audio Decoding Utilities
//!
//! Decode uploaded audio to f32 PCM samples for the heuristic scorer.
//!
//! Uses symphonia for format-agnostic decoding (WAV, MP3, FLAC, AAC, OGG, ...).
//! Only channel 0 is kept: analysis runs on the first channel of multichannel
//! audio, never a downmix.

use crate::types::{AudioSamples, MediaError};
use std::io::Cursor;
use std::path::Path;
use symphonia::core::audio::{AudioBuffer, AudioBufferRef, Signal};
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::conv::FromSample;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSource, MediaSourceStream};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::sample::Sample;

/// Decoded audio result
#[derive(Debug)]
pub struct DecodedAudio {
    /// Channel 0 samples (f32, range [-1.0, 1.0])
    pub samples: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Original channel count
    pub channels: usize,
    /// Duration in seconds
    pub duration_seconds: f64,
}

impl DecodedAudio {
    pub fn into_samples(self) -> AudioSamples {
        AudioSamples::new(self.samples, self.sample_rate)
    }
}

/// Decode an audio file from disk
///
/// The file extension is used as a probe hint.
///
/// # Errors
/// * `MediaError::Decode` on I/O failure, unsupported format or corrupt data
pub fn decode_audio_file(file_path: &Path) -> Result<DecodedAudio, MediaError> {
    tracing::debug!(path = %file_path.display(), "Decoding audio file");

    let file = std::fs::File::open(file_path).map_err(|e| {
        MediaError::Decode(format!(
            "Failed to open audio file {}: {}",
            file_path.display(),
            e
        ))
    })?;

    let mut hint = Hint::new();
    if let Some(extension) = file_path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(extension);
    }

    decode_source(Box::new(file), hint)
}

/// Decode an in-memory upload
///
/// `mime_type` (when sniffed) is passed to the prober as a hint.
///
/// # Errors
/// * `MediaError::Decode` on unsupported format or corrupt data
pub fn decode_audio_bytes(bytes: &[u8], mime_type: Option<&str>) -> Result<DecodedAudio, MediaError> {
    tracing::debug!(bytes = bytes.len(), mime_type = ?mime_type, "Decoding audio upload");

    let mut hint = Hint::new();
    if let Some(mime) = mime_type {
        hint.mime_type(mime);
    }

    decode_source(Box::new(Cursor::new(bytes.to_vec())), hint)
}

/// Probe, pick the first decodable track, decode every packet to channel-0 f32
fn decode_source(source: Box<dyn MediaSource>, hint: Hint) -> Result<DecodedAudio, MediaError> {
    let mss = MediaSourceStream::new(source, Default::default());

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| MediaError::Decode(format!("Failed to probe audio: {}", e)))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| MediaError::Decode("No audio track found".to_string()))?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| MediaError::Decode("Sample rate unknown".to_string()))?;
    let channel_count = track.codec_params.channels.map(|c| c.count()).unwrap_or(1);

    tracing::debug!(
        sample_rate = sample_rate,
        channels = channel_count,
        "Audio stream info"
    );

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| MediaError::Decode(format!("Failed to create decoder: {}", e)))?;

    let mut all_samples: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => {
                return Err(MediaError::Decode(format!("Error reading packet: {}", e)));
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = decoder
            .decode(&packet)
            .map_err(|e| MediaError::Decode(format!("Failed to decode packet: {}", e)))?;

        all_samples.extend(first_channel_f32(&decoded));
    }

    let duration_seconds = all_samples.len() as f64 / sample_rate as f64;

    tracing::debug!(
        total_samples = all_samples.len(),
        duration_seconds = format!("{:.2}", duration_seconds),
        "Audio decoding complete"
    );

    Ok(DecodedAudio {
        samples: all_samples,
        sample_rate,
        channels: channel_count,
        duration_seconds,
    })
}

/// Channel 0 of a decoded buffer as f32
fn first_channel_f32(decoded: &AudioBufferRef) -> Vec<f32> {
    match decoded {
        AudioBufferRef::F32(buf) => convert_channel(&**buf),
        AudioBufferRef::F64(buf) => convert_channel(&**buf),
        AudioBufferRef::U8(buf) => convert_channel(&**buf),
        AudioBufferRef::U16(buf) => convert_channel(&**buf),
        AudioBufferRef::U24(buf) => convert_channel(&**buf),
        AudioBufferRef::U32(buf) => convert_channel(&**buf),
        AudioBufferRef::S8(buf) => convert_channel(&**buf),
        AudioBufferRef::S16(buf) => convert_channel(&**buf),
        AudioBufferRef::S24(buf) => convert_channel(&**buf),
        AudioBufferRef::S32(buf) => convert_channel(&**buf),
    }
}

fn convert_channel<S: Sample>(buf: &AudioBuffer<S>) -> Vec<f32>
where
    f32: FromSample<S>,
{
    if buf.spec().channels.count() == 0 {
        return Vec::new();
    }
    buf.chan(0).iter().map(|&s| f32::from_sample(s)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_audio_file_not_found() {
        let result = decode_audio_file(Path::new("/nonexistent/file.wav"));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Failed to open audio file"));
    }

    #[test]
    fn test_decode_garbage_bytes_fails() {
        let result = decode_audio_bytes(b"definitely not audio", None);
        assert!(matches!(result, Err(MediaError::Decode(_))));
    }
}
