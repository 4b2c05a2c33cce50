use ::jni::JNIEnv;
use tracing::debug;
/// The pending-exception slot of a JNI environment.
pub(crate) trait PendingException {
  fn has_pending_exception(&mut self) -> bool;
  fn describe_and_clear(&mut self);
}
impl PendingException for JNIEnv<'_> {
  fn has_pending_exception(&mut self) -> bool {
    self.exception_check().unwrap_or(false)
  }
  fn describe_and_clear(&mut self) {
    let _described = self.exception_describe();
    let _cleared = self.exception_clear();
  }
}
/// Clears the Java exception a failed call left pending, so the thread can
/// keep making JNI calls. The error itself is passed through.
#[cfg_attr(not(target_os = "android"), allow(dead_code))]
pub(crate) fn settle<E, T>(env: &mut E, result: Result<T, anyhow::Error>) -> Result<T, anyhow::Error>
where
  E: PendingException + ?Sized,
{
  if let Err(err) = &result {
    if env.has_pending_exception() {
      debug!(error = %err, "Clearing pending Java exception");
      env.describe_and_clear();
    }
  }
  result
}
#[cfg(test)]
mod tests {
  use super::*;
  use anyhow::anyhow;
  #[derive(Default)]
  struct FakeEnv {
    pending: bool,
    cleared: usize,
  }
  impl PendingException for FakeEnv {
    fn has_pending_exception(&mut self) -> bool {
      self.pending
    }
    fn describe_and_clear(&mut self) {
      self.pending = false;
      self.cleared += 1;
    }
  }
  #[test]
  fn failed_call_clears_the_thrown_exception() {
    let mut env = FakeEnv {
      pending: true,
      ..FakeEnv::default()
    };
    let result = settle(&mut env, Err::<(), _>(anyhow!("setVoice threw")));
    assert_eq!(result.unwrap_err().to_string(), "setVoice threw");
    assert!(!env.pending);
    assert_eq!(env.cleared, 1);
  }
  #[test]
  fn failure_without_exception_leaves_env_alone() {
    let mut env = FakeEnv::default();
    assert!(settle(&mut env, Err::<(), _>(anyhow!("not created"))).is_err());
    assert_eq!(env.cleared, 0);
  }
  #[test]
  fn success_never_touches_the_exception_slot() {
    let mut env = FakeEnv {
      pending: true,
      ..FakeEnv::default()
    };
    assert_eq!(settle(&mut env, Ok(7)).unwrap(), 7);
    assert_eq!(env.cleared, 0);
  }
}
