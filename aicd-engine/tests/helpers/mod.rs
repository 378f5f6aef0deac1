//! Shared helpers for aicd-engine integration tests
#![allow(dead_code)]

pub mod audio_generator;
pub mod classifier_stub;
