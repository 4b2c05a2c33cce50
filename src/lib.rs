#![deny(clippy::all)]
#![deny(clippy::pedantic)]
//! Speaks text through the host speech service and lets the user pick among
//! the installed voices of one language.
//!
//! The engine is owned by a dedicated service thread; [`SpeechServiceHandle`]
//! queues commands for it and exposes its state, and [`SpeechController`]
//! is the thin layer a UI drives.
pub mod catalog;
pub mod config;
pub mod controller;
pub mod engines;
pub mod error;
mod jni;
mod jvm;
pub mod metadata;
pub mod notice;
pub mod service;
#[cfg(test)]
mod testing;
pub use crate::catalog::{VoiceCatalog, VoiceList};
pub use crate::config::SpeechConfig;
pub use crate::controller::SpeechController;
pub use crate::error::SpeechError;
pub use crate::metadata::Voice;
pub use crate::notice::{LogNotifier, Notice, Notifier, QueuedNotifier};
pub use crate::service::{ServiceEvent, ServiceState, SpeechServiceHandle};
