use thiserror::Error;
#[derive(Debug, Error)]
pub enum SpeechError {
  #[error("Failed to initialize the speech engine: {0}")]
  InitializeFailed(anyhow::Error),
  #[error("No speech engine is available on this platform")]
  EngineUnavailable,
  #[error("No voice was found with the name {0}")]
  VoiceNotFound(String),
  #[error("The speech engine does not support the language {0}")]
  LanguageNotSupported(String),
  #[error("Failed to speak with the speech engine ({engine}) and voice {voice}: {error}")]
  SpeakFailed {
    engine: String,
    voice: String,
    error: anyhow::Error,
  },
  #[error("Failed to stop the speech engine ({engine}) from speaking: {error}")]
  StopSpeechFailed {
    engine: String,
    error: anyhow::Error,
  },
  #[error("Failed to shut down the speech engine ({engine}): {error}")]
  ShutdownFailed {
    engine: String,
    error: anyhow::Error,
  },
  #[error("Invalid configuration: {0}")]
  InvalidConfig(anyhow::Error),
  #[error("Unknown error: {0}")]
  Unknown(anyhow::Error),
}
impl SpeechError {
  pub fn into_initialize_failed<T>(error: T) -> Self
  where
    T: Into<anyhow::Error>,
  {
    SpeechError::InitializeFailed(error.into())
  }
  pub fn into_voice_not_found(voice: &str) -> Self {
    SpeechError::VoiceNotFound(voice.to_owned())
  }
  pub fn into_language_not_supported(language: &str) -> Self {
    SpeechError::LanguageNotSupported(language.to_owned())
  }
  pub fn into_speak_failed<T>(engine: &str, voice: &str, error: T) -> Self
  where
    T: Into<anyhow::Error>,
  {
    SpeechError::SpeakFailed {
      engine: engine.to_owned(),
      voice: voice.to_owned(),
      error: error.into(),
    }
  }
  pub fn into_stop_speech_failed<T>(engine: &str, error: T) -> Self
  where
    T: Into<anyhow::Error>,
  {
    SpeechError::StopSpeechFailed {
      engine: engine.to_owned(),
      error: error.into(),
    }
  }
  pub fn into_shutdown_failed<T>(engine: &str, error: T) -> Self
  where
    T: Into<anyhow::Error>,
  {
    SpeechError::ShutdownFailed {
      engine: engine.to_owned(),
      error: error.into(),
    }
  }
  pub fn into_invalid_config<T>(error: T) -> Self
  where
    T: Into<anyhow::Error>,
  {
    SpeechError::InvalidConfig(error.into())
  }
  pub fn into_unknown<T>(error: T) -> Self
  where
    T: Into<anyhow::Error>,
  {
    SpeechError::Unknown(error.into())
  }
}
#[cfg(test)]
mod tests {
  use super::*;
  use anyhow::anyhow;
  #[test]
  fn speak_failed_names_engine_and_voice() {
    let error = SpeechError::into_speak_failed(
      "Speech Dispatcher",
      "espeak-ng/russian",
      anyhow!("socket closed"),
    );
    assert_eq!(
      error.to_string(),
      "Failed to speak with the speech engine (Speech Dispatcher) and voice espeak-ng/russian: socket closed"
    );
  }
  #[test]
  fn invalid_config_wraps_source() {
    let error = SpeechError::into_invalid_config(anyhow!("target_language is empty"));
    assert!(matches!(error, SpeechError::InvalidConfig(_)));
    assert_eq!(error.to_string(), "Invalid configuration: target_language is empty");
  }
}
