use crate::config::SpeechConfig;
use crate::controller::SpeechController;
use crate::error::SpeechError;
use crate::jvm::PendingException;
use crate::notice::QueuedNotifier;
use crate::service::SpeechServiceHandle;
use ::jni::objects::*;
use ::jni::sys::*;
use ::jni::JNIEnv;
use std::sync::{Arc, Mutex, PoisonError};
static CONTROLLER: Mutex<Option<SpeechController>> = Mutex::new(None);
static NOTICES: Mutex<Option<Arc<QueuedNotifier>>> = Mutex::new(None);
fn error_to_exception_class(error: &SpeechError) -> String {
  "org/voicepicker/error/".to_owned()
    + match error {
      SpeechError::InitializeFailed(_) => "InitializeFailedException",
      SpeechError::EngineUnavailable => "EngineUnavailableException",
      SpeechError::VoiceNotFound(_) => "VoiceNotFoundException",
      SpeechError::LanguageNotSupported(_) => "LanguageNotSupportedException",
      SpeechError::SpeakFailed {
        engine: _,
        voice: _,
        error: _,
      } => "SpeakFailedException",
      SpeechError::StopSpeechFailed {
        engine: _,
        error: _,
      } => "StopSpeechFailedException",
      SpeechError::ShutdownFailed {
        engine: _,
        error: _,
      } => "ShutdownFailedException",
      SpeechError::InvalidConfig(_) => "InvalidConfigException",
      SpeechError::Unknown(_) => "UnknownException",
    }
}
fn throw(env: &mut JNIEnv, error: &SpeechError) {
  if env.has_pending_exception() {
    return;
  }
  let _result = env.throw_new(error_to_exception_class(error), error.to_string());
}
fn controller() -> Option<SpeechController> {
  CONTROLLER
    .lock()
    .unwrap_or_else(PoisonError::into_inner)
    .clone()
}
fn to_jboolean(value: bool) -> jboolean {
  if value {
    JNI_TRUE
  } else {
    JNI_FALSE
  }
}
fn start(env: &mut JNIEnv, context: &JObject) -> Result<(), SpeechError> {
  if controller().is_some() {
    return Ok(());
  }
  let config = SpeechConfig::default().with_env_overrides()?;
  let notifier = Arc::new(QueuedNotifier::default());
  let service = SpeechServiceHandle::with_notifier(config, notifier.clone());
  #[cfg(target_os = "android")]
  {
    use crate::engines::android::{AndroidTts, LISTENER_CLASS};
    let vm = env.get_java_vm().map_err(SpeechError::into_initialize_failed)?;
    let context = env
      .new_global_ref(context)
      .map_err(SpeechError::into_initialize_failed)?;
    // App classes only resolve on a thread that entered from Java.
    let listener = env
      .new_object(LISTENER_CLASS, "()V", &[])
      .and_then(|listener| env.new_global_ref(listener))
      .map_err(SpeechError::into_initialize_failed)?;
    service.start(move || {
      Ok(Box::new(AndroidTts::new(vm, context, listener)) as Box<dyn crate::engines::SpeechEngine>)
    })?;
  }
  #[cfg(not(target_os = "android"))]
  {
    let _unused = (env, context);
    service.start(crate::engines::default_engine)?;
  }
  *NOTICES.lock().unwrap_or_else(PoisonError::into_inner) = Some(notifier);
  *CONTROLLER.lock().unwrap_or_else(PoisonError::into_inner) =
    Some(SpeechController::new(service));
  Ok(())
}
#[no_mangle]
pub extern "system" fn Java_org_voicepicker_VoicePicker_start<'local>(
  mut env: JNIEnv<'local>,
  _class: JClass<'local>,
  context: JObject<'local>,
) {
  if let Err(error) = start(&mut env, &context) {
    throw(&mut env, &error);
  }
}
#[no_mangle]
pub extern "system" fn Java_org_voicepicker_VoicePicker_speak<'local>(
  mut env: JNIEnv<'local>,
  _class: JClass<'local>,
  text: JString<'local>,
) {
  let text: String = match env.get_string(&text) {
    Ok(text) => text.into(),
    Err(error) => {
      throw(&mut env, &SpeechError::into_unknown(error));
      return;
    }
  };
  if let Some(controller) = controller() {
    controller.speak(&text);
  }
}
fn voices<'local>(env: &mut JNIEnv<'local>) -> Result<JObjectArray<'local>, ::jni::errors::Error> {
  let voices = controller().map(|controller| controller.voices()).unwrap_or_default();
  let string_class = env.find_class("java/lang/String")?;
  let length = jsize::try_from(voices.len()).unwrap_or(jsize::MAX);
  let array = env.new_object_array(length, &string_class, JObject::null())?;
  for (index, voice) in (0..length).zip(voices.iter()) {
    let label = env.new_string(&voice.display_name)?;
    env.set_object_array_element(&array, index, label)?;
  }
  Ok(array)
}
#[no_mangle]
pub extern "system" fn Java_org_voicepicker_VoicePicker_voices<'local>(
  mut env: JNIEnv<'local>,
  _class: JClass<'local>,
) -> JObjectArray<'local> {
  match voices(&mut env) {
    Ok(array) => array,
    Err(error) => {
      throw(&mut env, &SpeechError::into_unknown(error));
      JObjectArray::default()
    }
  }
}
#[no_mangle]
pub extern "system" fn Java_org_voicepicker_VoicePicker_selectVoice<'local>(
  _env: JNIEnv<'local>,
  _class: JClass<'local>,
  index: jint,
) -> jboolean {
  let selected = controller()
    .zip(usize::try_from(index).ok())
    .and_then(|(controller, index)| controller.select_voice_at(index))
    .is_some();
  to_jboolean(selected)
}
#[no_mangle]
pub extern "system" fn Java_org_voicepicker_VoicePicker_selectedVoice<'local>(
  _env: JNIEnv<'local>,
  _class: JClass<'local>,
) -> jint {
  controller()
    .and_then(|controller| controller.selected_index())
    .and_then(|index| jint::try_from(index).ok())
    .unwrap_or(-1)
}
#[no_mangle]
pub extern "system" fn Java_org_voicepicker_VoicePicker_isReady<'local>(
  _env: JNIEnv<'local>,
  _class: JClass<'local>,
) -> jboolean {
  to_jboolean(controller().is_some_and(|controller| controller.is_ready()))
}
#[no_mangle]
pub extern "system" fn Java_org_voicepicker_VoicePicker_pollNotice<'local>(
  mut env: JNIEnv<'local>,
  _class: JClass<'local>,
) -> JString<'local> {
  let notice = NOTICES
    .lock()
    .unwrap_or_else(PoisonError::into_inner)
    .as_ref()
    .and_then(|notices| notices.pop());
  let Some(notice) = notice else {
    return JString::default();
  };
  match env.new_string(notice.to_string()) {
    Ok(string) => string,
    Err(error) => {
      throw(&mut env, &SpeechError::into_unknown(error));
      JString::default()
    }
  }
}
#[no_mangle]
pub extern "system" fn Java_org_voicepicker_VoicePicker_shutdown<'local>(
  _env: JNIEnv<'local>,
  _class: JClass<'local>,
) {
  let controller = CONTROLLER
    .lock()
    .unwrap_or_else(PoisonError::into_inner)
    .take();
  if let Some(controller) = controller {
    controller.service().shutdown();
  }
}
