//! Audio Test Fixture Generator
//!
//! In-memory 16-bit PCM WAV files with a chosen signal per channel

use std::io::Cursor;
use std::path::Path;

/// Signal written to one channel
#[derive(Debug, Clone, Copy)]
pub enum Signal {
    Silence,
    Tone { freq: f32, amplitude: f32 },
}

impl Signal {
    fn sample(&self, i: usize, sample_rate: u32) -> i16 {
        match *self {
            Signal::Silence => 0,
            Signal::Tone { freq, amplitude } => {
                let t = i as f32 / sample_rate as f32;
                (amplitude * (2.0 * std::f32::consts::PI * freq * t).sin() * i16::MAX as f32) as i16
            }
        }
    }
}

/// Configuration for generated audio
#[derive(Debug, Clone)]
pub struct AudioConfig {
    pub duration_seconds: f64,
    pub sample_rate: u32,
    /// One entry per channel
    pub channels: Vec<Signal>,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            duration_seconds: 1.0,
            sample_rate: 44100,
            channels: vec![Signal::Silence],
        }
    }
}

fn spec(config: &AudioConfig) -> hound::WavSpec {
    hound::WavSpec {
        channels: config.channels.len() as u16,
        sample_rate: config.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    }
}

fn write_frames<W: std::io::Write + std::io::Seek>(
    writer: &mut hound::WavWriter<W>,
    config: &AudioConfig,
) -> anyhow::Result<()> {
    let total_frames = (config.duration_seconds * config.sample_rate as f64) as usize;
    for i in 0..total_frames {
        for signal in &config.channels {
            writer.write_sample(signal.sample(i, config.sample_rate))?;
        }
    }
    Ok(())
}

/// Generate WAV file bytes
pub fn wav_bytes(config: &AudioConfig) -> anyhow::Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec(config))?;
        write_frames(&mut writer, config)?;
        writer.finalize()?;
    }
    Ok(cursor.into_inner())
}

/// Generate a WAV file on disk
pub fn write_wav(path: &Path, config: &AudioConfig) -> anyhow::Result<()> {
    let mut writer = hound::WavWriter::create(path, spec(config))?;
    write_frames(&mut writer, config)?;
    writer.finalize()?;
    Ok(())
}

/// One second of mono silence
pub fn silent_wav() -> Vec<u8> {
    wav_bytes(&AudioConfig::default()).unwrap()
}
