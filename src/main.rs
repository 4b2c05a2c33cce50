//! Terminal front end: every line read from stdin is spoken, replacing the
//! previous utterance.
//!
//! `:voices` lists the catalog, `:voice N` selects its N-th entry and `:quit`
//! (or end of input) shuts the engine down. An optional first argument names
//! a TOML config file. Logs go to stderr.
use std::io::BufRead;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use voice_picker::engines::default_engine;
use voice_picker::{
  Notice, ServiceEvent, SpeechConfig, SpeechController, SpeechServiceHandle, VoiceList,
};
fn print_voices(voices: &VoiceList, selected: Option<usize>) {
  if voices.is_empty() {
    println!("No voices available");
    return;
  }
  for (index, voice) in voices.iter().enumerate() {
    let marker = if selected == Some(index) { '*' } else { ' ' };
    println!("{marker} {index}: {} ({})", voice.display_name, voice.locale());
  }
}
fn run_command(controller: &SpeechController, line: &str) -> bool {
  match line.split_once(' ').unwrap_or((line, "")) {
    (":quit", _) => return false,
    (":voices", _) => print_voices(&controller.voices(), controller.selected_index()),
    (":voice", index) => match index.trim().parse::<usize>() {
      Ok(index) => match controller.select_voice_at(index) {
        Some(voice) => println!("Selected {}", voice.display_name),
        None => println!("Could not select voice {index}"),
      },
      Err(_) => println!("Usage: :voice N"),
    },
    _ => controller.speak(line),
  }
  true
}
fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();
  let config = match std::env::args().nth(1) {
    Some(path) => SpeechConfig::load(Path::new(&path))?,
    None => SpeechConfig::default(),
  }
  .with_env_overrides()?;
  info!(
    language = %config.target_language,
    locale = %config.default_locale,
    "Starting speech service"
  );
  let service = SpeechServiceHandle::with_notifier(
    config,
    Arc::new(|notice: Notice| println!("{notice}")),
  );
  let events = service.subscribe();
  thread::spawn(move || {
    for event in events {
      if let ServiceEvent::CatalogUpdated { voices } = event {
        println!("{voices} voices available, :voices lists them");
      }
    }
  });
  service.start(default_engine)?;
  let controller = SpeechController::new(service);
  for line in std::io::stdin().lock().lines() {
    let line = match line {
      Ok(line) => line,
      Err(err) => {
        error!(error = %err, "Failed to read from stdin");
        break;
      }
    };
    let line = line.trim();
    if !run_command(&controller, line) {
      break;
    }
  }
  controller.service().shutdown();
  info!("Speech service shut down");
  Ok(())
}
