use crate::engines::{InitCallback, InitStatus, QueueMode, SpeechEngine};
use crate::error::SpeechError;
use crate::metadata::Voice;
use anyhow::anyhow;
use objc2::rc::Retained;
use objc2_avf_audio::{
  AVSpeechBoundary, AVSpeechSynthesisVoice, AVSpeechSynthesizer, AVSpeechUtterance,
};
use objc2_foundation::{NSDate, NSRunLoop, NSString};
const NAME: &str = "AVSpeechSynthesizer";
fn run_run_loop(duration: f64) {
  unsafe {
    let run_loop = NSRunLoop::currentRunLoop();
    let date = NSDate::now().dateByAddingTimeInterval(duration);
    run_loop.runUntilDate(&date);
  }
}
fn to_voice(voice: &AVSpeechSynthesisVoice) -> Voice {
  unsafe {
    Voice::new(
      &voice.identifier().to_string(),
      &voice.name().to_string(),
      &voice.language().to_string(),
    )
  }
}
#[derive(Default)]
pub struct AvSpeechSynthesizer {
  synthesizer: Option<Retained<AVSpeechSynthesizer>>,
  voice: Option<Retained<AVSpeechSynthesisVoice>>,
}
impl AvSpeechSynthesizer {
  pub fn new() -> Self {
    AvSpeechSynthesizer::default()
  }
  fn synthesizer(&self) -> Result<&AVSpeechSynthesizer, anyhow::Error> {
    self
      .synthesizer
      .as_deref()
      .ok_or(anyhow!("AVSpeechSynthesizer has not been created"))
  }
}
impl SpeechEngine for AvSpeechSynthesizer {
  fn name(&self) -> String {
    NAME.to_owned()
  }
  fn initialize(&mut self, on_initialized: InitCallback) {
    self.synthesizer = Some(unsafe { AVSpeechSynthesizer::new() });
    run_run_loop(0.1);
    on_initialized(InitStatus::Success);
  }
  fn set_language(&mut self, language: &str) -> Result<(), SpeechError> {
    let tag = NSString::from_str(&language.replace('_', "-"));
    let voice = unsafe { AVSpeechSynthesisVoice::voiceWithLanguage(Some(&tag)) }
      .ok_or(SpeechError::into_language_not_supported(language))?;
    self.voice = Some(voice);
    Ok(())
  }
  fn list_voices(&mut self) -> Result<Vec<Voice>, SpeechError> {
    let voices = unsafe { AVSpeechSynthesisVoice::speechVoices() };
    Ok(voices.iter().map(|voice| to_voice(&voice)).collect())
  }
  fn current_voice(&mut self) -> Result<Option<Voice>, SpeechError> {
    Ok(self.voice.as_deref().map(to_voice))
  }
  fn set_voice(&mut self, voice: &Voice) -> Result<(), SpeechError> {
    let identifier = NSString::from_str(&voice.name);
    let found = unsafe { AVSpeechSynthesisVoice::voiceWithIdentifier(&identifier) }
      .ok_or(SpeechError::into_voice_not_found(&voice.name))?;
    self.voice = Some(found);
    Ok(())
  }
  fn speak(&mut self, text: &str, mode: QueueMode) -> Result<(), SpeechError> {
    let voice_name = self
      .voice
      .as_deref()
      .map_or_else(|| "default".to_owned(), |voice| to_voice(voice).name);
    let synthesizer = self
      .synthesizer()
      .map_err(|err| SpeechError::into_speak_failed(NAME, &voice_name, err))?;
    unsafe {
      match mode {
        QueueMode::Flush => {
          let _stopped = synthesizer.stopSpeakingAtBoundary(AVSpeechBoundary::Immediate);
        }
      }
      let text = NSString::from_str(text);
      let utterance = AVSpeechUtterance::speechUtteranceWithString(&text);
      utterance.setVoice(self.voice.as_deref());
      synthesizer.speakUtterance(&utterance);
    }
    run_run_loop(0.1);
    Ok(())
  }
  fn stop(&mut self) -> Result<(), SpeechError> {
    let synthesizer = self
      .synthesizer()
      .map_err(|err| SpeechError::into_stop_speech_failed(NAME, err))?;
    let _stopped = unsafe { synthesizer.stopSpeakingAtBoundary(AVSpeechBoundary::Immediate) };
    Ok(())
  }
  fn shutdown(&mut self) -> Result<(), SpeechError> {
    self.voice = None;
    self
      .synthesizer
      .take()
      .map(drop)
      .ok_or(SpeechError::into_shutdown_failed(
        NAME,
        anyhow!("AVSpeechSynthesizer has not been created"),
      ))
  }
}
