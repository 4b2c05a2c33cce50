//! Lifecycle of the platform speech engine.
//!
//! The engine lives on a dedicated worker thread and is only touched there.
//! Everything else (the UI thread, the engine's own initialization callback)
//! talks to it by posting [`Command`]s, and reads the state, the catalog and
//! the selected voice from snapshots the worker publishes.
use crate::catalog::{VoiceCatalog, VoiceList};
use crate::config::SpeechConfig;
use crate::engines::{InitStatus, QueueMode, SpeechEngine};
use crate::error::SpeechError;
use crate::metadata::Voice;
use crate::notice::{LogNotifier, Notice, Notifier};
use std::fmt;
use std::ops::ControlFlow;
use std::sync::{mpsc, Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::thread;
use tracing::{debug, error, info, warn};
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServiceState {
  Uninitialized,
  Initializing,
  Ready,
  Failed,
  ShuttingDown,
  Shutdown,
}
impl fmt::Display for ServiceState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      ServiceState::Uninitialized => "uninitialized",
      ServiceState::Initializing => "initializing",
      ServiceState::Ready => "ready",
      ServiceState::Failed => "failed",
      ServiceState::ShuttingDown => "shutting down",
      ServiceState::Shutdown => "shut down",
    };
    f.write_str(name)
  }
}
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ServiceEvent {
  Ready,
  CatalogUpdated { voices: usize },
  Failed,
  Shutdown,
}
pub(crate) enum Command {
  Initialized(InitStatus),
  Speak(String),
  SelectVoice(Voice),
  Shutdown(mpsc::Sender<()>),
}
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
  mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
struct Shared {
  config: SpeechConfig,
  notifier: Arc<dyn Notifier>,
  catalog: VoiceCatalog,
  state: RwLock<ServiceState>,
  active_voice: RwLock<Option<Voice>>,
  subscribers: Mutex<Vec<mpsc::Sender<ServiceEvent>>>,
}
impl Shared {
  fn new(config: SpeechConfig, notifier: Arc<dyn Notifier>) -> Self {
    Shared {
      catalog: VoiceCatalog::new(&config.target_language),
      config,
      notifier,
      state: RwLock::new(ServiceState::Uninitialized),
      active_voice: RwLock::new(None),
      subscribers: Mutex::new(Vec::new()),
    }
  }
  fn state(&self) -> ServiceState {
    *self.state.read().unwrap_or_else(PoisonError::into_inner)
  }
  fn set_state(&self, state: ServiceState) {
    *self.state.write().unwrap_or_else(PoisonError::into_inner) = state;
  }
  fn active_voice(&self) -> Option<Voice> {
    self
      .active_voice
      .read()
      .unwrap_or_else(PoisonError::into_inner)
      .clone()
  }
  fn set_active_voice(&self, voice: Option<Voice>) {
    *self
      .active_voice
      .write()
      .unwrap_or_else(PoisonError::into_inner) = voice;
  }
  fn publish(&self, event: &ServiceEvent) {
    lock(&self.subscribers).retain(|subscriber| subscriber.send(event.clone()).is_ok());
  }
  fn fail(&self) {
    self.set_state(ServiceState::Failed);
    self.notifier.notify(Notice::InitializationFailed);
    self.publish(&ServiceEvent::Failed);
  }
  fn finish(&self) {
    let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
    if *state != ServiceState::Shutdown {
      *state = ServiceState::Shutdown;
      drop(state);
      self.publish(&ServiceEvent::Shutdown);
    }
  }
}
struct Worker {
  engine: Box<dyn SpeechEngine>,
  shared: Arc<Shared>,
  /// The voice the engine last accepted.
  engine_voice: Option<Voice>,
}
impl Worker {
  fn handle(&mut self, command: Command) -> ControlFlow<()> {
    match command {
      Command::Initialized(status) => self.on_initialized(status),
      Command::Speak(text) => self.speak(&text),
      Command::SelectVoice(voice) => self.select_voice(&voice),
      Command::Shutdown(ack) => {
        self.teardown();
        let _result = ack.send(());
        return ControlFlow::Break(());
      }
    }
    ControlFlow::Continue(())
  }
  fn on_initialized(&mut self, status: InitStatus) {
    let state = self.shared.state();
    if state != ServiceState::Initializing {
      debug!(%state, ?status, "Ignoring initialization callback");
      return;
    }
    if status == InitStatus::Failure {
      error!(engine = %self.engine.name(), "Speech engine failed to initialize");
      self.shared.fail();
      return;
    }
    let locale = &self.shared.config.default_locale;
    if let Err(err) = self.engine.set_language(locale) {
      warn!(%locale, error = %err, "Speech engine rejected the default locale");
    }
    // The catalog and the default voice are in place before anyone can
    // observe Ready.
    let current = self.engine.current_voice().unwrap_or_else(|err| {
      warn!(error = %err, "Failed to read the current voice");
      None
    });
    self.engine_voice.clone_from(&current);
    self.shared.set_active_voice(current);
    let voices = self.engine.list_voices().unwrap_or_else(|err| {
      warn!(error = %err, "Failed to list voices");
      Vec::new()
    });
    let reported = voices.len();
    let count = self.shared.catalog.refresh(voices);
    info!(
      reported,
      kept = count,
      language = %self.shared.catalog.target_language(),
      "Voice catalog refreshed"
    );
    self.shared.set_state(ServiceState::Ready);
    info!(engine = %self.engine.name(), "Speech engine is ready");
    self.shared.notifier.notify(Notice::Initialized);
    self.shared.publish(&ServiceEvent::Ready);
    self.shared.publish(&ServiceEvent::CatalogUpdated { voices: count });
  }
  fn speak(&mut self, text: &str) {
    let state = self.shared.state();
    if state != ServiceState::Ready {
      debug!(%state, "Dropping utterance, speech engine is not ready");
      return;
    }
    if let Err(err) = self.engine.speak(text, QueueMode::Flush) {
      warn!(error = %err, "Failed to speak");
    }
  }
  fn select_voice(&mut self, voice: &Voice) {
    let state = self.shared.state();
    if state != ServiceState::Ready {
      debug!(%state, voice = %voice.name, "Ignoring voice selection");
      return;
    }
    match self.engine.set_voice(voice) {
      Ok(()) => self.engine_voice = Some(voice.clone()),
      Err(err) => {
        warn!(voice = %voice.name, error = %err, "Failed to set voice");
        // A later selection may already be pending; only undo this one.
        if self.shared.active_voice().as_ref() == Some(voice) {
          self.shared.set_active_voice(self.engine_voice.clone());
        }
      }
    }
  }
  fn teardown(&mut self) {
    if self.shared.state() == ServiceState::Ready {
      self.shared.set_state(ServiceState::ShuttingDown);
      if let Err(err) = self.engine.stop() {
        warn!(error = %err, "Failed to stop speech before shutdown");
      }
      if let Err(err) = self.engine.shutdown() {
        warn!(error = %err, "Failed to shut down the speech engine");
      }
      info!(engine = %self.engine.name(), "Speech engine released");
    }
    self.shared.finish();
  }
}
fn run<F>(
  shared: Arc<Shared>,
  factory: F,
  init_tx: mpsc::Sender<Command>,
  commands: mpsc::Receiver<Command>,
) where
  F: FnOnce() -> Result<Box<dyn SpeechEngine>, SpeechError>,
{
  let engine = match factory() {
    Ok(engine) => engine,
    Err(err) => {
      error!(error = %err, "Failed to create the speech engine");
      shared.fail();
      return;
    }
  };
  let mut worker = Worker {
    engine,
    shared,
    engine_voice: None,
  };
  debug!(engine = %worker.engine.name(), "Initializing speech engine");
  worker.engine.initialize(Box::new(move |status| {
    let _result = init_tx.send(Command::Initialized(status));
  }));
  for command in commands {
    if worker.handle(command).is_break() {
      return;
    }
  }
  worker.teardown();
}
/// Owns the platform speech engine for the lifetime of the application.
///
/// Clones share the same engine. Reads never block on the engine; commands
/// return as soon as they are queued.
#[derive(Clone)]
pub struct SpeechServiceHandle {
  shared: Arc<Shared>,
  commands: Arc<Mutex<Option<mpsc::Sender<Command>>>>,
}
impl SpeechServiceHandle {
  pub fn new(config: SpeechConfig) -> Self {
    Self::with_notifier(config, Arc::new(LogNotifier))
  }
  pub fn with_notifier(config: SpeechConfig, notifier: Arc<dyn Notifier>) -> Self {
    SpeechServiceHandle {
      shared: Arc::new(Shared::new(config, notifier)),
      commands: Arc::new(Mutex::new(None)),
    }
  }
  /// Begins initializing the engine built by `factory` on the service thread.
  /// Only the first call on an uninitialized handle has an effect.
  pub fn start<F>(&self, factory: F) -> Result<(), SpeechError>
  where
    F: FnOnce() -> Result<Box<dyn SpeechEngine>, SpeechError> + Send + 'static,
  {
    let mut commands = lock(&self.commands);
    let state = self.shared.state();
    if state != ServiceState::Uninitialized {
      warn!(%state, "Speech service was already started");
      return Ok(());
    }
    self.shared.set_state(ServiceState::Initializing);
    let (command_tx, command_rx) = mpsc::channel();
    let init_tx = command_tx.clone();
    let shared = Arc::clone(&self.shared);
    thread::Builder::new()
      .name("speech-service".to_owned())
      .spawn(move || run(shared, factory, init_tx, command_rx))
      .map_err(|err| {
        self.shared.fail();
        SpeechError::into_initialize_failed(err)
      })?;
    *commands = Some(command_tx);
    Ok(())
  }
  pub fn state(&self) -> ServiceState {
    self.shared.state()
  }
  pub fn is_ready(&self) -> bool {
    self.state() == ServiceState::Ready
  }
  pub fn config(&self) -> &SpeechConfig {
    &self.shared.config
  }
  pub fn catalog(&self) -> &VoiceCatalog {
    &self.shared.catalog
  }
  pub fn voices(&self) -> VoiceList {
    self.shared.catalog.voices()
  }
  pub fn active_voice(&self) -> Option<Voice> {
    self.shared.active_voice()
  }
  pub fn subscribe(&self) -> mpsc::Receiver<ServiceEvent> {
    let (event_tx, event_rx) = mpsc::channel();
    lock(&self.shared.subscribers).push(event_tx);
    event_rx
  }
  pub(crate) fn set_active_voice(&self, voice: Option<Voice>) {
    self.shared.set_active_voice(voice);
  }
  pub(crate) fn send(&self, command: Command) {
    if let Some(commands) = lock(&self.commands).as_ref() {
      if commands.send(command).is_err() {
        debug!("Speech service thread has exited");
      }
    }
  }
  /// Stops any utterance in flight and releases the engine, waiting until
  /// both have happened. Calling it again, or on a handle that never became
  /// ready, does not touch the engine.
  pub fn shutdown(&self) {
    let Some(commands) = lock(&self.commands).take() else {
      if self.shared.state() == ServiceState::Uninitialized {
        self.shared.finish();
      }
      return;
    };
    let (ack_tx, ack_rx) = mpsc::channel();
    if commands.send(Command::Shutdown(ack_tx)).is_ok() {
      let _result = ack_rx.recv();
    }
    self.shared.finish();
  }
}
impl fmt::Debug for SpeechServiceHandle {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("SpeechServiceHandle")
      .field("state", &self.state())
      .field("voices", &self.voices().len())
      .finish_non_exhaustive()
  }
}
