use crate::engines::{InitCallback, InitStatus, QueueMode, SpeechEngine};
use crate::error::SpeechError;
use crate::metadata::Voice;
use std::sync::{mpsc, Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant};
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EngineCall {
  Initialize,
  SetLanguage(String),
  ListVoices,
  CurrentVoice,
  SetVoice(String),
  Speak(String, QueueMode),
  Stop,
  Shutdown,
}
/// Test-side view of a [`RecordingEngine`] running on the service thread.
#[derive(Default)]
pub struct EngineTap {
  voices: Vec<Voice>,
  immediate: Option<InitStatus>,
  calls: Mutex<Vec<EngineCall>>,
  pending: Mutex<Option<InitCallback>>,
  listing_gate: Mutex<Option<mpsc::Receiver<()>>>,
}
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
  mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
impl EngineTap {
  pub fn with_voices(voices: Vec<Voice>) -> Arc<Self> {
    Arc::new(EngineTap {
      voices,
      ..EngineTap::default()
    })
  }
  pub fn initializing_immediately(status: InitStatus, voices: Vec<Voice>) -> Arc<Self> {
    Arc::new(EngineTap {
      voices,
      immediate: Some(status),
      ..EngineTap::default()
    })
  }
  /// Like [`EngineTap::initializing_immediately`], but `list_voices`
  /// blocks until the returned sender fires or is dropped.
  pub fn with_gated_listing(voices: Vec<Voice>) -> (Arc<Self>, mpsc::Sender<()>) {
    let (gate_tx, gate_rx) = mpsc::channel();
    let tap = Arc::new(EngineTap {
      voices,
      immediate: Some(InitStatus::Success),
      listing_gate: Mutex::new(Some(gate_rx)),
      ..EngineTap::default()
    });
    (tap, gate_tx)
  }
  pub fn calls(&self) -> Vec<EngineCall> {
    lock(&self.calls).clone()
  }
  pub fn count<P>(&self, predicate: P) -> usize
  where
    P: Fn(&EngineCall) -> bool,
  {
    lock(&self.calls).iter().filter(|call| predicate(call)).count()
  }
  /// Plays the platform's part: waits for the engine to be asked to
  /// initialize, then reports `status` from the calling thread.
  pub fn finish_initialization(&self, status: InitStatus) {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
      if let Some(callback) = lock(&self.pending).take() {
        callback(status);
        return;
      }
      assert!(Instant::now() < deadline, "engine was never initialized");
      thread::sleep(Duration::from_millis(5));
    }
  }
  fn record(&self, call: EngineCall) {
    lock(&self.calls).push(call);
  }
}
pub struct RecordingEngine {
  tap: Arc<EngineTap>,
  voice: Option<Voice>,
}
impl RecordingEngine {
  pub fn new(tap: Arc<EngineTap>) -> Self {
    let voice = tap.voices.first().cloned();
    RecordingEngine { tap, voice }
  }
}
impl SpeechEngine for RecordingEngine {
  fn name(&self) -> String {
    "Recording".to_owned()
  }
  fn initialize(&mut self, on_initialized: InitCallback) {
    self.tap.record(EngineCall::Initialize);
    match self.tap.immediate {
      Some(status) => on_initialized(status),
      None => *lock(&self.tap.pending) = Some(on_initialized),
    }
  }
  fn set_language(&mut self, language: &str) -> Result<(), SpeechError> {
    self.tap.record(EngineCall::SetLanguage(language.to_owned()));
    Ok(())
  }
  fn list_voices(&mut self) -> Result<Vec<Voice>, SpeechError> {
    self.tap.record(EngineCall::ListVoices);
    let gate = lock(&self.tap.listing_gate).take();
    if let Some(gate) = gate {
      let _released = gate.recv();
    }
    Ok(self.tap.voices.clone())
  }
  fn current_voice(&mut self) -> Result<Option<Voice>, SpeechError> {
    self.tap.record(EngineCall::CurrentVoice);
    Ok(self.voice.clone())
  }
  fn set_voice(&mut self, voice: &Voice) -> Result<(), SpeechError> {
    self.tap.record(EngineCall::SetVoice(voice.name.clone()));
    self.voice = Some(voice.clone());
    Ok(())
  }
  fn speak(&mut self, text: &str, mode: QueueMode) -> Result<(), SpeechError> {
    self.tap.record(EngineCall::Speak(text.to_owned(), mode));
    Ok(())
  }
  fn stop(&mut self) -> Result<(), SpeechError> {
    self.tap.record(EngineCall::Stop);
    Ok(())
  }
  fn shutdown(&mut self) -> Result<(), SpeechError> {
    self.tap.record(EngineCall::Shutdown);
    Ok(())
  }
}
