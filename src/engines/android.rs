//! `android.speech.tts.TextToSpeech`, driven over JNI.
//!
//! The platform reports readiness through an `OnInitListener`. The Java side
//! ships `org.voicepicker.InitListener`, whose `onInit` is the native
//! function at the bottom of this file; it hands the status to whichever
//! engine is waiting for it. The listener has to be instantiated on a thread
//! that can see the app's classes, so it is created by the caller and passed
//! in.
use crate::engines::{InitCallback, InitStatus, QueueMode, SpeechEngine};
use crate::error::SpeechError;
use crate::jvm::settle;
use crate::metadata::Voice;
use ::jni::errors::Error as JniError;
use ::jni::objects::{GlobalRef, JObject, JString, JValue};
use ::jni::sys::jint;
use ::jni::{JNIEnv, JavaVM};
use anyhow::anyhow;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, warn};
const NAME: &str = "Android TextToSpeech";
const SUCCESS: jint = 0;
const ERROR: jint = -1;
const QUEUE_FLUSH: jint = 0;
const LANG_MISSING_DATA: jint = -1;
const LANG_NOT_SUPPORTED: jint = -2;
const TTS_CLASS: &str = "android/speech/tts/TextToSpeech";
pub const LISTENER_CLASS: &str = "org/voicepicker/InitListener";
static PENDING_INIT: Mutex<Option<InitCallback>> = Mutex::new(None);
fn take_pending() -> Option<InitCallback> {
  PENDING_INIT
    .lock()
    .unwrap_or_else(PoisonError::into_inner)
    .take()
}
fn java_string(env: &mut JNIEnv, object: JObject) -> Result<String, JniError> {
  let string = JString::from(object);
  Ok(env.get_string(&string)?.into())
}
fn to_voice(env: &mut JNIEnv, voice: &JObject) -> Result<Voice, JniError> {
  let name = env
    .call_method(voice, "getName", "()Ljava/lang/String;", &[])?
    .l()?;
  let name = java_string(env, name)?;
  let locale = env
    .call_method(voice, "getLocale", "()Ljava/util/Locale;", &[])?
    .l()?;
  let tag = env
    .call_method(&locale, "toLanguageTag", "()Ljava/lang/String;", &[])?
    .l()?;
  let tag = java_string(env, tag)?;
  Ok(Voice::new(&name, &name, &tag))
}
pub struct AndroidTts {
  vm: JavaVM,
  context: GlobalRef,
  listener: GlobalRef,
  tts: Option<GlobalRef>,
  voices: Vec<(Voice, GlobalRef)>,
}
impl AndroidTts {
  /// `listener` is an instance of [`LISTENER_CLASS`].
  pub fn new(vm: JavaVM, context: GlobalRef, listener: GlobalRef) -> Self {
    AndroidTts {
      vm,
      context,
      listener,
      tts: None,
      voices: Vec::new(),
    }
  }
  fn create(&mut self) -> Result<(), anyhow::Error> {
    let mut env = self.vm.attach_current_thread()?;
    let tts = env
      .new_object(
        TTS_CLASS,
        "(Landroid/content/Context;Landroid/speech/tts/TextToSpeech$OnInitListener;)V",
        &[
          JValue::Object(self.context.as_obj()),
          JValue::Object(self.listener.as_obj()),
        ],
      )
      .map_err(anyhow::Error::from);
    let tts = settle(&mut *env, tts)?;
    self.tts = Some(env.new_global_ref(tts)?);
    Ok(())
  }
  /// Runs `operation` against the `TextToSpeech` instance on an attached
  /// thread, clearing whatever exception a failed call left behind.
  fn call<T, F>(&self, operation: F) -> Result<T, anyhow::Error>
  where
    F: FnOnce(&mut JNIEnv, &GlobalRef) -> Result<T, anyhow::Error>,
  {
    let tts = self
      .tts
      .as_ref()
      .ok_or(anyhow!("TextToSpeech has not been created"))?;
    let mut env = self.vm.attach_current_thread()?;
    let result = operation(&mut env, tts);
    settle(&mut *env, result)
  }
  fn java_voice(&self, voice: &Voice) -> Option<&GlobalRef> {
    self
      .voices
      .iter()
      .find(|(candidate, _)| candidate == voice)
      .map(|(_, object)| object)
  }
}
impl SpeechEngine for AndroidTts {
  fn name(&self) -> String {
    NAME.to_owned()
  }
  fn initialize(&mut self, on_initialized: InitCallback) {
    *PENDING_INIT.lock().unwrap_or_else(PoisonError::into_inner) = Some(on_initialized);
    if let Err(err) = self.create() {
      warn!(error = %err, "Failed to create TextToSpeech");
      if let Some(on_initialized) = take_pending() {
        on_initialized(InitStatus::Failure);
      }
    }
  }
  fn set_language(&mut self, language: &str) -> Result<(), SpeechError> {
    let result = self
      .call(|env, tts| {
        let tag = env.new_string(language)?;
        let locale = env
          .call_static_method(
            "java/util/Locale",
            "forLanguageTag",
            "(Ljava/lang/String;)Ljava/util/Locale;",
            &[JValue::Object(&tag)],
          )?
          .l()?;
        Ok(
          env
            .call_method(tts, "setLanguage", "(Ljava/util/Locale;)I", &[JValue::Object(&locale)])?
            .i()?,
        )
      })
      .map_err(SpeechError::into_unknown)?;
    match result {
      LANG_MISSING_DATA | LANG_NOT_SUPPORTED => {
        Err(SpeechError::into_language_not_supported(language))
      }
      _ => Ok(()),
    }
  }
  fn list_voices(&mut self) -> Result<Vec<Voice>, SpeechError> {
    let voices = self
      .call(|env, tts| {
        let set = env
          .call_method(tts, "getVoices", "()Ljava/util/Set;", &[])?
          .l()?;
        let mut voices = Vec::new();
        if set.is_null() {
          return Ok(voices);
        }
        let iterator = env
          .call_method(&set, "iterator", "()Ljava/util/Iterator;", &[])?
          .l()?;
        while env.call_method(&iterator, "hasNext", "()Z", &[])?.z()? {
          let voice = env
            .call_method(&iterator, "next", "()Ljava/lang/Object;", &[])?
            .l()?;
          let global = env.new_global_ref(&voice)?;
          voices.push((to_voice(env, &voice)?, global));
          env.delete_local_ref(voice)?;
        }
        Ok(voices)
      })
      .map_err(SpeechError::into_unknown)?;
    debug!(count = voices.len(), "TextToSpeech reported voices");
    self.voices = voices;
    Ok(self.voices.iter().map(|(voice, _)| voice.clone()).collect())
  }
  fn current_voice(&mut self) -> Result<Option<Voice>, SpeechError> {
    self
      .call(|env, tts| {
        let voice = env
          .call_method(tts, "getVoice", "()Landroid/speech/tts/Voice;", &[])?
          .l()?;
        if voice.is_null() {
          return Ok(None);
        }
        Ok(Some(to_voice(env, &voice)?))
      })
      .map_err(SpeechError::into_unknown)
  }
  fn set_voice(&mut self, voice: &Voice) -> Result<(), SpeechError> {
    let object = self
      .java_voice(voice)
      .ok_or(SpeechError::into_voice_not_found(&voice.name))?;
    let result = self
      .call(|env, tts| {
        Ok(
          env
            .call_method(
              tts,
              "setVoice",
              "(Landroid/speech/tts/Voice;)I",
              &[JValue::Object(object.as_obj())],
            )?
            .i()?,
        )
      })
      .map_err(|err| SpeechError::into_speak_failed(NAME, &voice.name, err))?;
    if result == ERROR {
      Err(SpeechError::into_speak_failed(
        NAME,
        &voice.name,
        anyhow!("TextToSpeech rejected the voice"),
      ))?;
    }
    Ok(())
  }
  fn speak(&mut self, text: &str, mode: QueueMode) -> Result<(), SpeechError> {
    let queue_mode = match mode {
      QueueMode::Flush => QUEUE_FLUSH,
    };
    let result = self.call(|env, tts| {
      let text = env.new_string(text)?;
      let null = JObject::null();
      Ok(
        env
          .call_method(
            tts,
            "speak",
            "(Ljava/lang/CharSequence;ILandroid/os/Bundle;Ljava/lang/String;)I",
            &[
              JValue::Object(&text),
              JValue::Int(queue_mode),
              JValue::Object(&null),
              JValue::Object(&null),
            ],
          )?
          .i()?,
      )
    });
    match result {
      Ok(ERROR) => Err(SpeechError::into_speak_failed(
        NAME,
        "current",
        anyhow!("TextToSpeech refused the utterance"),
      )),
      Ok(_) => Ok(()),
      Err(err) => Err(SpeechError::into_speak_failed(NAME, "current", err)),
    }
  }
  fn stop(&mut self) -> Result<(), SpeechError> {
    self
      .call(|env, tts| {
        env.call_method(tts, "stop", "()I", &[])?;
        Ok(())
      })
      .map_err(|err| SpeechError::into_stop_speech_failed(NAME, err))
  }
  fn shutdown(&mut self) -> Result<(), SpeechError> {
    self
      .call(|env, tts| {
        env.call_method(tts, "shutdown", "()V", &[])?;
        Ok(())
      })
      .map_err(|err| SpeechError::into_shutdown_failed(NAME, err))?;
    self.voices.clear();
    self.tts = None;
    Ok(())
  }
}
#[no_mangle]
pub extern "system" fn Java_org_voicepicker_InitListener_onInit<'local>(
  _env: JNIEnv<'local>,
  _this: JObject<'local>,
  status: jint,
) {
  let status = if status == SUCCESS {
    InitStatus::Success
  } else {
    InitStatus::Failure
  };
  match take_pending() {
    Some(on_initialized) => on_initialized(status),
    None => debug!(?status, "TextToSpeech initialized with nobody waiting"),
  }
}
