use crate::engines::{InitCallback, InitStatus, QueueMode, SpeechEngine};
use crate::error::SpeechError;
use crate::metadata::Voice;
use anyhow::anyhow;
use ssip_client_async::*;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use tracing::{debug, warn};
type SsipClient = Client<fifo::UnixStream>;
const NAME: &str = "Speech Dispatcher";
#[derive(Default)]
pub struct SpeechDispatcher {
  client: Arc<Mutex<Option<SsipClient>>>,
  default_output_module: Option<String>,
  voice: Option<Voice>,
}
fn connect() -> Result<SsipClient, anyhow::Error> {
  let mut client = fifo::Builder::new().build()?;
  client
    .set_client_name(ClientName::new("", "voice-picker"))?
    .check_client_name_set()?;
  Ok(client)
}
impl SpeechDispatcher {
  pub fn new() -> Self {
    SpeechDispatcher::default()
  }
  fn with_client<T, F>(&self, operation: F) -> Result<T, anyhow::Error>
  where
    F: FnOnce(&mut SsipClient) -> Result<T, anyhow::Error>,
  {
    let mut client = self.client.lock().unwrap_or_else(PoisonError::into_inner);
    let client = client
      .as_mut()
      .ok_or(anyhow!("Not connected to Speech Dispatcher"))?;
    operation(client)
  }
  fn voice_name(&self) -> String {
    self
      .voice
      .as_ref()
      .map_or_else(|| "default".to_owned(), |voice| voice.name.clone())
  }
}
impl SpeechEngine for SpeechDispatcher {
  fn name(&self) -> String {
    NAME.to_owned()
  }
  fn initialize(&mut self, on_initialized: InitCallback) {
    let slot = Arc::clone(&self.client);
    let spawned = thread::Builder::new()
      .name("speech-dispatcher-connect".to_owned())
      .spawn(move || match connect() {
        Ok(client) => {
          *slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(client);
          on_initialized(InitStatus::Success);
        }
        Err(err) => {
          warn!(error = %err, "Failed to connect to Speech Dispatcher");
          on_initialized(InitStatus::Failure);
        }
      });
    if let Err(err) = spawned {
      warn!(error = %err, "Failed to spawn the Speech Dispatcher connection thread");
    }
  }
  fn set_language(&mut self, language: &str) -> Result<(), SpeechError> {
    let language = language.to_lowercase().replace('_', "-");
    let default_output_module = self
      .with_client(|client| {
        client
          .set_language(ClientScope::Current, &language)?
          .check_status(OK_LANGUAGE_SET)?;
        Ok(
          client
            .get_output_module()?
            .receive_string(OK_GET)?,
        )
      })
      .map_err(|_| SpeechError::into_language_not_supported(&language))?;
    self.default_output_module = Some(default_output_module);
    Ok(())
  }
  fn list_voices(&mut self) -> Result<Vec<Voice>, SpeechError> {
    let default_output_module = self.default_output_module.clone();
    self
      .with_client(|client| {
        let modules = client
          .list_output_modules()?
          .receive_lines(OK_OUTPUT_MODULES_LIST_SENT)?;
        let voices = modules
          .iter()
          .flat_map(|module| {
            client
              .set_output_module(ClientScope::Current, module)?
              .check_status(OK_OUTPUT_MODULE_SET)?;
            let voices = client
              .list_synthesis_voices()?
              .receive_synthesis_voices()?
              .into_iter()
              .map(|voice| {
                let display_name = voice.name.clone() + " (" + module + ")";
                let name = module.clone() + "/" + &voice.name;
                Voice::new(&name, &display_name, voice.language.as_deref().unwrap_or_default())
              })
              .collect::<Vec<Voice>>();
            Ok::<Vec<Voice>, anyhow::Error>(voices)
          })
          .flatten()
          .collect::<Vec<Voice>>();
        if let Some(module) = default_output_module {
          client
            .set_output_module(ClientScope::Current, &module)?
            .check_status(OK_OUTPUT_MODULE_SET)?;
        }
        Ok(voices)
      })
      .map_err(SpeechError::into_unknown)
  }
  fn current_voice(&mut self) -> Result<Option<Voice>, SpeechError> {
    Ok(self.voice.clone())
  }
  fn set_voice(&mut self, voice: &Voice) -> Result<(), SpeechError> {
    let (output_module, name) = voice
      .name
      .split_once('/')
      .ok_or(SpeechError::into_voice_not_found(&voice.name))?;
    self
      .with_client(|client| {
        client
          .set_output_module(ClientScope::Current, output_module)?
          .check_status(OK_OUTPUT_MODULE_SET)?;
        client
          .set_synthesis_voice(ClientScope::Current, name)?
          .check_status(OK_VOICE_SET)?;
        Ok(())
      })
      .map_err(|err| SpeechError::into_speak_failed(NAME, &voice.name, err))?;
    self.voice = Some(voice.clone());
    Ok(())
  }
  fn speak(&mut self, text: &str, mode: QueueMode) -> Result<(), SpeechError> {
    match mode {
      QueueMode::Flush => self.stop()?,
    }
    let lines = text
      .lines()
      .map(std::borrow::ToOwned::to_owned)
      .collect::<Vec<String>>();
    let message_id = self
      .with_client(|client| {
        Ok(
          client
            .speak()?
            .check_receiving_data()?
            .send_lines(&lines)?
            .receive_message_id()?,
        )
      })
      .map_err(|err| SpeechError::into_speak_failed(NAME, &self.voice_name(), err))?;
    debug!(?message_id, "Queued utterance");
    Ok(())
  }
  fn stop(&mut self) -> Result<(), SpeechError> {
    self
      .with_client(|client| {
        client
          .cancel(MessageScope::Last)?
          .check_status(OK_CANCELED)?;
        Ok(())
      })
      .map_err(|err| SpeechError::into_stop_speech_failed(NAME, err))
  }
  fn shutdown(&mut self) -> Result<(), SpeechError> {
    let client = self
      .client
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .take();
    match client {
      Some(client) => {
        drop(client);
        Ok(())
      }
      None => Err(SpeechError::into_shutdown_failed(
        NAME,
        anyhow!("Not connected to Speech Dispatcher"),
      )),
    }
  }
}
