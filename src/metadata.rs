#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Voice {
  pub name: String,
  pub display_name: String,
  pub language: String,
  pub region: Option<String>,
}
impl Voice {
  pub fn new(name: &str, display_name: &str, locale: &str) -> Self {
    let (language, region) = split_locale(locale);
    Voice {
      name: name.to_owned(),
      display_name: display_name.to_owned(),
      language,
      region,
    }
  }
  pub fn locale(&self) -> String {
    match &self.region {
      Some(region) => self.language.clone() + "-" + region,
      None => self.language.clone(),
    }
  }
}
/// Splits a platform locale tag (`ru_RU`, `ru-ru`, `RU`) into a lowercase
/// language code and an optional uppercase region code.
pub fn split_locale(tag: &str) -> (String, Option<String>) {
  let mut parts = tag.trim().split(['_', '-']);
  let language = parts.next().unwrap_or_default().to_lowercase();
  let region = parts
    .next()
    .filter(|region| !region.is_empty())
    .map(str::to_uppercase);
  (language, region)
}
