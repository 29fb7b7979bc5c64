use std::path::Path;

use afpack_error::Error;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{BuildResult, DIST_DIR};

pub const CWD_KEY: &str = "cwd";
pub const OUTPUT_PATH_KEY: &str = "outputPath";
pub const DISABLE_CSS_MODULES_KEY: &str = "disableCSSModules";

/// Loosely typed build options, keyed the same way as a fixture's `config.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildOptions(Map<String, Value>);

impl BuildOptions {
  pub fn new() -> Self {
    Self::default()
  }

  /// Options every fixture starts from before its overlay is applied.
  pub fn for_fixture(cwd: &Path) -> Self {
    let mut opts = Self::new();
    opts.insert(CWD_KEY, cwd.to_string_lossy());
    opts.insert(OUTPUT_PATH_KEY, cwd.join(DIST_DIR).to_string_lossy());
    opts.insert(DISABLE_CSS_MODULES_KEY, true);
    opts
  }

  pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
    self.0.insert(key.into(), value.into())
  }

  pub fn get(&self, key: &str) -> Option<&Value> {
    self.0.get(key)
  }

  pub fn remove(&mut self, key: &str) -> Option<Value> {
    self.0.remove(key)
  }

  pub fn contains_key(&self, key: &str) -> bool {
    self.0.contains_key(key)
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
    self.0.iter()
  }

  /// Shallow merge. Keys of `overlay` replace keys of `self`.
  pub fn merge(mut self, overlay: Map<String, Value>) -> Self {
    for (key, value) in overlay {
      self.0.insert(key, value);
    }
    self
  }

  pub fn into_map(self) -> Map<String, Value> {
    self.0
  }

  pub fn take_str(&mut self, key: &str) -> BuildResult<Option<String>> {
    match self.0.remove(key) {
      None | Some(Value::Null) => Ok(None),
      Some(Value::String(s)) => Ok(Some(s)),
      Some(_) => Err(Error::invalid_option(key, "a string")),
    }
  }

  pub fn take_bool(&mut self, key: &str) -> BuildResult<Option<bool>> {
    match self.0.remove(key) {
      None | Some(Value::Null) => Ok(None),
      Some(Value::Bool(b)) => Ok(Some(b)),
      Some(_) => Err(Error::invalid_option(key, "a boolean")),
    }
  }
}

impl From<Map<String, Value>> for BuildOptions {
  fn from(map: Map<String, Value>) -> Self {
    Self(map)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
  Production,
  Development,
}

impl Mode {
  pub fn as_str(&self) -> &'static str {
    match self {
      Mode::Production => "production",
      Mode::Development => "development",
    }
  }
}

pub const NODE_ENV: &str = "NODE_ENV";
pub const NO_COMPRESS: &str = "NO_COMPRESS";

/// Build-mode switches handed to the synthesizer. [CommandBundler](crate::CommandBundler)
/// exports them to the child as `NODE_ENV` and `NO_COMPRESS`.
///
/// The default is what fixtures are built with: production mode, no compression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildEnv {
  pub mode: Mode,
  pub compress: bool,
}

impl Default for BuildEnv {
  fn default() -> Self {
    Self {
      mode: Mode::Production,
      compress: false,
    }
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn overlay_wins_and_base_survives() {
    let base = BuildOptions::for_fixture(Path::new("/fx/basic"));
    let overlay = json!({ "disableCSSModules": false, "hash": true });
    let merged = base.clone().merge(overlay.as_object().unwrap().clone());

    assert_eq!(merged.get("disableCSSModules"), Some(&json!(false)));
    assert_eq!(merged.get("hash"), Some(&json!(true)));
    for (key, value) in base.iter() {
      if key != "disableCSSModules" {
        assert_eq!(merged.get(key), Some(value));
      }
    }
    assert_eq!(merged.len(), 4);
  }

  #[test]
  fn fixture_defaults() {
    let opts = BuildOptions::for_fixture(Path::new("/fx/basic"));
    assert_eq!(opts.get(CWD_KEY), Some(&json!("/fx/basic")));
    assert_eq!(opts.get(OUTPUT_PATH_KEY), Some(&json!("/fx/basic/dist")));
    assert_eq!(opts.get(DISABLE_CSS_MODULES_KEY), Some(&json!(true)));
  }

  #[test]
  fn typed_take() {
    let mut opts = BuildOptions::new();
    opts.insert("hash", "yes");
    let err = opts.take_bool("hash").unwrap_err();
    assert_eq!(err.kind.code(), "INVALID_OPTION");
    assert!(!opts.contains_key("hash"));
    assert_eq!(opts.take_str("missing").unwrap(), None);
  }
}
