use crate::metadata::Voice;
use std::sync::{Arc, RwLock};
/// An immutable snapshot of the catalog. Cloning is cheap and iterating it
/// never observes a later refresh.
#[derive(Clone, Debug, Default)]
pub struct VoiceList(Arc<[Voice]>);
impl VoiceList {
  pub fn iter(&self) -> std::slice::Iter<'_, Voice> {
    self.0.iter()
  }
  pub fn len(&self) -> usize {
    self.0.len()
  }
  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
  pub fn get(&self, index: usize) -> Option<&Voice> {
    self.0.get(index)
  }
  pub fn position(&self, voice: &Voice) -> Option<usize> {
    self.0.iter().position(|candidate| candidate == voice)
  }
  pub fn contains(&self, voice: &Voice) -> bool {
    self.position(voice).is_some()
  }
}
impl<'a> IntoIterator for &'a VoiceList {
  type Item = &'a Voice;
  type IntoIter = std::slice::Iter<'a, Voice>;
  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}
pub fn filter_by_language(voices: Vec<Voice>, language: &str) -> Vec<Voice> {
  voices
    .into_iter()
    .filter(|voice| voice.language == language)
    .collect()
}
#[derive(Debug)]
pub struct VoiceCatalog {
  target_language: String,
  snapshot: RwLock<VoiceList>,
}
impl VoiceCatalog {
  pub fn new(target_language: &str) -> Self {
    VoiceCatalog {
      target_language: target_language.to_owned(),
      snapshot: RwLock::new(VoiceList::default()),
    }
  }
  pub fn target_language(&self) -> &str {
    &self.target_language
  }
  /// Replaces the catalog with the voices of the target language, keeping the
  /// order the platform reported them in. Returns the new size.
  pub fn refresh(&self, voices: Vec<Voice>) -> usize {
    let filtered: Arc<[Voice]> = filter_by_language(voices, &self.target_language).into();
    let count = filtered.len();
    let mut snapshot = self
      .snapshot
      .write()
      .unwrap_or_else(std::sync::PoisonError::into_inner);
    *snapshot = VoiceList(filtered);
    count
  }
  pub fn voices(&self) -> VoiceList {
    self
      .snapshot
      .read()
      .unwrap_or_else(std::sync::PoisonError::into_inner)
      .clone()
  }
  pub fn contains(&self, voice: &Voice) -> bool {
    self.voices().contains(voice)
  }
}
#[cfg(test)]
mod tests {
  use super::*;
  fn platform_voices() -> Vec<Voice> {
    vec![
      Voice::new("1", "Russian 1", "ru_RU"),
      Voice::new("2", "English", "en_US"),
      Voice::new("3", "Russian 2", "ru"),
    ]
  }
  #[test]
  fn keeps_target_language_in_platform_order() {
    let catalog = VoiceCatalog::new("ru");
    assert_eq!(catalog.refresh(platform_voices()), 2);
    let snapshot = catalog.voices();
    let names = snapshot
      .iter()
      .map(|voice| voice.name.as_str())
      .collect::<Vec<&str>>();
    assert_eq!(names, ["1", "3"]);
  }
  #[test]
  fn empty_before_refresh_and_when_nothing_matches() {
    let catalog = VoiceCatalog::new("ru");
    assert!(catalog.voices().is_empty());
    catalog.refresh(vec![Voice::new("2", "English", "en_US")]);
    assert!(catalog.voices().is_empty());
    catalog.refresh(Vec::new());
    assert!(catalog.voices().is_empty());
  }
  #[test]
  fn snapshot_survives_refresh() {
    let catalog = VoiceCatalog::new("ru");
    catalog.refresh(platform_voices());
    let before = catalog.voices();
    catalog.refresh(vec![Voice::new("4", "Russian 3", "ru_UA")]);
    assert_eq!(before.len(), 2);
    assert_eq!(catalog.voices().len(), 1);
    assert_eq!(before.iter().count(), (&before).into_iter().count());
  }
  #[test]
  fn membership_and_position() {
    let catalog = VoiceCatalog::new("ru");
    catalog.refresh(platform_voices());
    let voices = catalog.voices();
    assert_eq!(voices.position(&Voice::new("3", "Russian 2", "ru")), Some(1));
    assert!(catalog.contains(&Voice::new("1", "Russian 1", "ru_RU")));
    assert!(!catalog.contains(&Voice::new("2", "English", "en_US")));
  }
}
