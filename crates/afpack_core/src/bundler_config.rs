use std::{
  collections::BTreeMap,
  path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::Mode;

pub const DEFAULT_ENTRY_NAME: &str = "index";

/// Everything the bundler needs for one build.
///
/// Options the synthesizer does not understand are carried through `extra`
/// and serialized next to the known fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundlerConfig {
  pub mode: Mode,
  /// Directory relative entries are resolved against.
  pub context: PathBuf,
  pub entry: BTreeMap<String, PathBuf>,
  pub output: OutputConfig,
  pub css_modules: bool,
  /// Mirrors `BuildEnv::compress`; exported to child processes as `NO_COMPRESS`.
  pub compress: bool,
  pub minimize: bool,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputConfig {
  pub path: PathBuf,
  pub filename: String,
  pub public_path: String,
}

impl BundlerConfig {
  /// Replace all entries with a single `index` entry.
  pub fn set_entry(&mut self, entry: impl AsRef<Path>) {
    self.entry = BTreeMap::from([(
      DEFAULT_ENTRY_NAME.to_string(),
      entry.as_ref().to_path_buf(),
    )]);
  }

  pub fn set_output_path(&mut self, path: impl AsRef<Path>) {
    self.output.path = path.as_ref().to_path_buf();
  }
}
