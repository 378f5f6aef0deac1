//! Utility modules for aicd-engine

pub mod audio_decoder;
pub mod media_type;

pub use audio_decoder::{decode_audio_bytes, decode_audio_file, DecodedAudio};
pub use media_type::ensure_media;
