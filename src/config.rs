use crate::error::SpeechError;
use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::path::Path;
pub const LANGUAGE_ENV: &str = "VOICE_PICKER_LANGUAGE";
pub const LOCALE_ENV: &str = "VOICE_PICKER_LOCALE";
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SpeechConfig {
  /// Only voices whose language equals this tag are offered.
  pub target_language: String,
  /// Locale handed to the engine once it is ready.
  pub default_locale: String,
}
impl Default for SpeechConfig {
  fn default() -> Self {
    SpeechConfig {
      target_language: "ru".to_owned(),
      default_locale: "ru".to_owned(),
    }
  }
}
impl SpeechConfig {
  pub fn from_toml_str(text: &str) -> Result<Self, SpeechError> {
    let config: SpeechConfig = toml::from_str(text).map_err(SpeechError::into_invalid_config)?;
    config.normalized()
  }
  pub fn load(path: &Path) -> Result<Self, SpeechError> {
    let text = std::fs::read_to_string(path).map_err(|err| {
      SpeechError::into_invalid_config(anyhow!("Failed to read {}: {err}", path.display()))
    })?;
    Self::from_toml_str(&text)
  }
  pub fn with_env_overrides(self) -> Result<Self, SpeechError> {
    self.with_overrides(
      std::env::var(LANGUAGE_ENV).ok(),
      std::env::var(LOCALE_ENV).ok(),
    )
  }
  fn with_overrides(
    mut self,
    target_language: Option<String>,
    default_locale: Option<String>,
  ) -> Result<Self, SpeechError> {
    if let Some(target_language) = target_language {
      self.target_language = target_language;
    }
    if let Some(default_locale) = default_locale {
      self.default_locale = default_locale;
    }
    self.normalized()
  }
  fn normalized(mut self) -> Result<Self, SpeechError> {
    self.target_language = self.target_language.trim().to_lowercase();
    self.default_locale = self.default_locale.trim().to_owned();
    if self.target_language.is_empty() {
      Err(SpeechError::into_invalid_config(anyhow!("target_language is empty")))?;
    }
    if self.default_locale.is_empty() {
      Err(SpeechError::into_invalid_config(anyhow!("default_locale is empty")))?;
    }
    Ok(self)
  }
}
#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Write;
  #[test]
  fn defaults_to_russian() {
    let config = SpeechConfig::from_toml_str("").unwrap();
    assert_eq!(config, SpeechConfig::default());
    assert_eq!(config.target_language, "ru");
  }
  #[test]
  fn normalizes_language_case() {
    let config = SpeechConfig::from_toml_str("target_language = \" UK \"\n").unwrap();
    assert_eq!(config.target_language, "uk");
    assert_eq!(config.default_locale, "ru");
  }
  #[test]
  fn rejects_empty_language() {
    let error = SpeechConfig::from_toml_str("target_language = \"\"").unwrap_err();
    assert!(matches!(error, SpeechError::InvalidConfig(_)));
  }
  #[test]
  fn rejects_malformed_toml() {
    assert!(SpeechConfig::from_toml_str("target_language = ").is_err());
  }
  #[test]
  fn overrides_replace_file_values() {
    let config = SpeechConfig::default()
      .with_overrides(Some("EN".to_owned()), Some("en_GB".to_owned()))
      .unwrap();
    assert_eq!(config.target_language, "en");
    assert_eq!(config.default_locale, "en_GB");
  }
  #[test]
  fn loads_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "target_language = \"be\"\ndefault_locale = \"be_BY\"").unwrap();
    let config = SpeechConfig::load(file.path()).unwrap();
    assert_eq!(config.target_language, "be");
    assert_eq!(config.default_locale, "be_BY");
  }
  #[test]
  fn missing_file_is_invalid_config() {
    let directory = tempfile::tempdir().unwrap();
    let error = SpeechConfig::load(&directory.path().join("absent.toml")).unwrap_err();
    assert!(matches!(error, SpeechError::InvalidConfig(_)));
  }
}
