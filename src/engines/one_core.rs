use crate::engines::{InitCallback, InitStatus, QueueMode, SpeechEngine};
use crate::error::SpeechError;
use crate::metadata::Voice;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use std::io::Cursor;
use tracing::warn;
use windows::core::HSTRING;
use windows::Media::SpeechSynthesis::{SpeechSynthesizer as Synthesizer, VoiceInformation};
use windows::Storage::Streams::DataReader;
const NAME: &str = "OneCore";
fn to_voice(voice: &VoiceInformation) -> Result<Voice, anyhow::Error> {
  let display_name = voice.DisplayName()?.to_string();
  let name = voice.Id()?.to_string();
  let language = voice.Language()?.to_string();
  Ok(Voice::new(&name, &display_name, &language))
}
/// OneCore only synthesizes into a WAV stream; playback goes through a rodio
/// sink, and flushing means stopping that sink.
pub struct OneCore {
  synthesizer: Synthesizer,
  output: Option<(OutputStream, OutputStreamHandle, Sink)>,
}
impl OneCore {
  pub fn new() -> Result<Self, SpeechError> {
    Ok(OneCore {
      synthesizer: Synthesizer::new().map_err(SpeechError::into_initialize_failed)?,
      output: None,
    })
  }
  fn sink(&self) -> Result<&Sink, anyhow::Error> {
    self
      .output
      .as_ref()
      .map(|(_, _, sink)| sink)
      .ok_or(anyhow::anyhow!("No audio output is open"))
  }
  fn synthesize(&self, text: &str) -> Result<Vec<u8>, anyhow::Error> {
    let text: HSTRING = text.into();
    let stream = self.synthesizer.SynthesizeTextToStreamAsync(&text)?.get()?;
    let size = u32::try_from(stream.Size()?)?;
    let reader = DataReader::CreateDataReader(&stream.GetInputStreamAt(0)?)?;
    reader.LoadAsync(size)?.get()?;
    let mut data = vec![0u8; size as usize];
    reader.ReadBytes(&mut data)?;
    Ok(data)
  }
}
impl SpeechEngine for OneCore {
  fn name(&self) -> String {
    NAME.to_owned()
  }
  fn initialize(&mut self, on_initialized: InitCallback) {
    let opened = (|| {
      let (stream, handle) = OutputStream::try_default()?;
      let sink = Sink::try_new(&handle)?;
      Ok::<_, anyhow::Error>((stream, handle, sink))
    })();
    match opened {
      Ok(output) => {
        self.output = Some(output);
        on_initialized(InitStatus::Success);
      }
      Err(err) => {
        warn!(error = %err, "Failed to open the audio output");
        on_initialized(InitStatus::Failure);
      }
    }
  }
  fn set_language(&mut self, language: &str) -> Result<(), SpeechError> {
    let (language, _) = crate::metadata::split_locale(language);
    let voice = Synthesizer::AllVoices()
      .map_err(SpeechError::into_unknown)?
      .into_iter()
      .find(|voice| {
        voice
          .Language()
          .is_ok_and(|tag| crate::metadata::split_locale(&tag.to_string()).0 == language)
      })
      .ok_or(SpeechError::into_language_not_supported(&language))?;
    self
      .synthesizer
      .SetVoice(&voice)
      .map_err(|_| SpeechError::into_language_not_supported(&language))
  }
  fn list_voices(&mut self) -> Result<Vec<Voice>, SpeechError> {
    let voices = Synthesizer::AllVoices()
      .map_err(SpeechError::into_unknown)?
      .into_iter()
      .flat_map(|voice| to_voice(&voice))
      .collect::<Vec<Voice>>();
    Ok(voices)
  }
  fn current_voice(&mut self) -> Result<Option<Voice>, SpeechError> {
    let voice = self.synthesizer.Voice().map_err(SpeechError::into_unknown)?;
    Ok(Some(to_voice(&voice).map_err(SpeechError::into_unknown)?))
  }
  fn set_voice(&mut self, voice: &Voice) -> Result<(), SpeechError> {
    let information = Synthesizer::AllVoices()
      .map_err(|err| SpeechError::into_speak_failed(NAME, &voice.name, err))?
      .into_iter()
      .find(|candidate| candidate.Id().is_ok_and(|id| id.to_string() == voice.name))
      .ok_or(SpeechError::into_voice_not_found(&voice.name))?;
    self
      .synthesizer
      .SetVoice(&information)
      .map_err(|err| SpeechError::into_speak_failed(NAME, &voice.name, err))
  }
  fn speak(&mut self, text: &str, mode: QueueMode) -> Result<(), SpeechError> {
    let voice = self
      .synthesizer
      .Voice()
      .and_then(|voice| voice.Id())
      .map_or_else(|_| "default".to_owned(), |id| id.to_string());
    let data = self
      .synthesize(text)
      .map_err(|err| SpeechError::into_speak_failed(NAME, &voice, err))?;
    let source = Decoder::new(Cursor::new(data))
      .map_err(|err| SpeechError::into_speak_failed(NAME, &voice, err))?;
    let sink = self
      .sink()
      .map_err(|err| SpeechError::into_speak_failed(NAME, &voice, err))?;
    match mode {
      QueueMode::Flush => sink.stop(),
    }
    sink.append(source);
    Ok(())
  }
  fn stop(&mut self) -> Result<(), SpeechError> {
    self
      .sink()
      .map_err(|err| SpeechError::into_stop_speech_failed(NAME, err))?
      .stop();
    Ok(())
  }
  fn shutdown(&mut self) -> Result<(), SpeechError> {
    self
      .output
      .take()
      .map(drop)
      .ok_or(SpeechError::into_shutdown_failed(
        NAME,
        anyhow::anyhow!("No audio output is open"),
      ))
  }
}
