//! Test harness utilities for observing how a resolver drives a listener.
//!
//! The recording listener logs every setter call in order so tests can check
//! which configuration source was applied and with which values.

#![allow(dead_code)]

mod recording;

pub use recording::{Call, RecordingListener};
