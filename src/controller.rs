use crate::catalog::VoiceList;
use crate::metadata::Voice;
use crate::service::{Command, ServiceState, SpeechServiceHandle};
use tracing::{debug, warn};
/// The operations a UI may perform against a started [`SpeechServiceHandle`].
#[derive(Clone, Debug)]
pub struct SpeechController {
  service: SpeechServiceHandle,
}
impl SpeechController {
  pub fn new(service: SpeechServiceHandle) -> Self {
    SpeechController { service }
  }
  pub fn service(&self) -> &SpeechServiceHandle {
    &self.service
  }
  /// Replaces whatever is being said with `text`. Does nothing for empty
  /// text or before the engine is ready.
  pub fn speak(&self, text: &str) {
    if text.is_empty() {
      return;
    }
    let state = self.service.state();
    if state != ServiceState::Ready {
      debug!(%state, "Ignoring speak request");
      return;
    }
    self.service.send(Command::Speak(text.to_owned()));
  }
  /// Makes `voice` the one later utterances use. `voice` has to come from
  /// the current catalog; anything else is logged and ignored. Returns
  /// whether the selection was accepted.
  ///
  /// [`SpeechController::selected_voice`] reports `voice` right away. If the
  /// engine then rejects it, the selection falls back to the voice the
  /// engine last accepted.
  pub fn select_voice(&self, voice: &Voice) -> bool {
    let state = self.service.state();
    if state != ServiceState::Ready {
      warn!(%state, voice = %voice.name, "Ignoring voice selection");
      return false;
    }
    if !self.service.catalog().contains(voice) {
      warn!(voice = %voice.name, "Ignoring voice that is not in the catalog");
      return false;
    }
    self.service.set_active_voice(Some(voice.clone()));
    self.service.send(Command::SelectVoice(voice.clone()));
    true
  }
  pub fn select_voice_at(&self, index: usize) -> Option<Voice> {
    let Some(voice) = self.voices().get(index).cloned() else {
      warn!(index, "No voice at this catalog position");
      return None;
    };
    self.select_voice(&voice).then_some(voice)
  }
  pub fn voices(&self) -> VoiceList {
    self.service.voices()
  }
  pub fn selected_voice(&self) -> Option<Voice> {
    self.service.active_voice()
  }
  /// Position of the selected voice in the catalog, if it is part of it.
  pub fn selected_index(&self) -> Option<usize> {
    let voice = self.selected_voice()?;
    self.voices().position(&voice)
  }
  pub fn is_ready(&self) -> bool {
    self.service.is_ready()
  }
  pub fn state(&self) -> ServiceState {
    self.service.state()
  }
}
