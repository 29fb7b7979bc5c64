use std::path::Path;

use afpack_error::Error;
use serde_json::Value;

use crate::{BuildOptions, BuildResult};

pub const CONFIG_FILE_NAME: &str = "config.json";

/// Merge `cwd/config.json`, when it exists, over `base`.
pub fn load_build_options(cwd: &Path, base: BuildOptions) -> BuildResult<BuildOptions> {
  let config_path = cwd.join(CONFIG_FILE_NAME);
  if !config_path.is_file() {
    return Ok(base);
  }

  let content = std::fs::read_to_string(&config_path)
    .map_err(|e| Error::io_error(e).context(format!("reading {}", config_path.display())))?;
  let overlay: Value =
    serde_json::from_str(&content).map_err(|e| Error::config_parse(&config_path, e))?;
  match overlay {
    Value::Object(overlay) => {
      tracing::trace!("Applying {} option(s) from {}", overlay.len(), config_path.display());
      Ok(base.merge(overlay))
    }
    _ => Err(Error::config_not_an_object(&config_path)),
  }
}

#[cfg(test)]
mod tests {
  use std::fs;

  use serde_json::json;

  use super::*;

  #[test]
  fn missing_config_keeps_base() {
    let dir = tempfile::tempdir().unwrap();
    let base = BuildOptions::for_fixture(dir.path());
    assert_eq!(load_build_options(dir.path(), base.clone()).unwrap(), base);
  }

  #[test]
  fn overlay_is_merged() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
      dir.path().join(CONFIG_FILE_NAME),
      r#"{ "disableCSSModules": false, "publicPath": "/static/" }"#,
    )
    .unwrap();
    let merged = load_build_options(dir.path(), BuildOptions::for_fixture(dir.path())).unwrap();
    assert_eq!(merged.get("disableCSSModules"), Some(&json!(false)));
    assert_eq!(merged.get("publicPath"), Some(&json!("/static/")));
    assert_eq!(
      merged.get("cwd"),
      Some(&json!(dir.path().to_string_lossy()))
    );
  }

  #[test]
  fn malformed_json_fails() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(CONFIG_FILE_NAME), "{ hash: true").unwrap();
    let err = load_build_options(dir.path(), BuildOptions::new()).unwrap_err();
    assert_eq!(err.kind.code(), "CONFIG_PARSE");
  }

  #[test]
  fn non_object_fails() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(CONFIG_FILE_NAME), "[1, 2]").unwrap();
    let err = load_build_options(dir.path(), BuildOptions::new()).unwrap_err();
    assert_eq!(err.kind.code(), "CONFIG_PARSE");
  }
}
