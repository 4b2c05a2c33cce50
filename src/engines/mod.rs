#[cfg(target_os = "android")]
pub mod android;
#[cfg(target_os = "macos")]
pub mod av_speech_synthesizer;
#[cfg(windows)]
pub mod one_core;
#[cfg(target_os = "linux")]
pub mod speech_dispatcher;
use crate::error::SpeechError;
use crate::metadata::Voice;
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InitStatus {
  Success,
  Failure,
}
/// How a new utterance interacts with whatever the engine is already saying.
/// Only flushing is ever requested: the current and pending utterances are
/// discarded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueueMode {
  Flush,
}
pub type InitCallback = Box<dyn FnOnce(InitStatus) + Send>;
/// A host speech service.
///
/// Implementations are only ever driven from one thread. `initialize` must
/// return without waiting for the platform; the callback may fire from any
/// thread, at most once, and possibly before `initialize` returns.
#[cfg_attr(test, mockall::automock)]
pub trait SpeechEngine {
  fn name(&self) -> String;
  fn initialize(&mut self, on_initialized: InitCallback);
  fn set_language(&mut self, language: &str) -> Result<(), SpeechError>;
  fn list_voices(&mut self) -> Result<Vec<Voice>, SpeechError>;
  fn current_voice(&mut self) -> Result<Option<Voice>, SpeechError>;
  fn set_voice(&mut self, voice: &Voice) -> Result<(), SpeechError>;
  fn speak(&mut self, text: &str, mode: QueueMode) -> Result<(), SpeechError>;
  fn stop(&mut self) -> Result<(), SpeechError>;
  fn shutdown(&mut self) -> Result<(), SpeechError>;
}
/// Connects to the speech service of the host platform. Runs on the service
/// worker thread.
#[allow(unreachable_code)]
pub fn default_engine() -> Result<Box<dyn SpeechEngine>, SpeechError> {
  #[cfg(target_os = "linux")]
  {
    return Ok(Box::new(speech_dispatcher::SpeechDispatcher::new()));
  }
  #[cfg(windows)]
  {
    return Ok(Box::new(one_core::OneCore::new()?));
  }
  #[cfg(target_os = "macos")]
  {
    return Ok(Box::new(av_speech_synthesizer::AvSpeechSynthesizer::new()));
  }
  Err(SpeechError::EngineUnavailable)
}
