use std::{fs, path::Path};

use afpack_core::{list_files, BuildResult, DIST_DIR, EXPECTED_DIR};
use afpack_error::Error;

/// Replace `cwd/expected` with the current contents of `cwd/dist`.
pub fn accept_output(cwd: &Path) -> BuildResult<Vec<String>> {
  let dist = cwd.join(DIST_DIR);
  let expected = cwd.join(EXPECTED_DIR);
  let files = list_files(&dist)?;

  if expected.exists() {
    fs::remove_dir_all(&expected)
      .map_err(|e| Error::io_error(e).context(format!("removing {}", expected.display())))?;
  }
  fs::create_dir_all(&expected)?;
  for file in &files {
    let dest = expected.join(file);
    if let Some(parent) = dest.parent() {
      fs::create_dir_all(parent)?;
    }
    fs::copy(dist.join(file), &dest)
      .map_err(|e| Error::io_error(e).context(format!("copying {file} to {}", dest.display())))?;
  }
  tracing::info!("Accepted {} file(s) into {}", files.len(), expected.display());
  Ok(files)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn expected_mirrors_dist() {
    let dir = tempfile::tempdir().unwrap();
    let dist = dir.path().join(DIST_DIR);
    fs::create_dir_all(dist.join("assets")).unwrap();
    fs::write(dist.join("index.js"), "new").unwrap();
    fs::write(dist.join("assets/a.css"), "a{}").unwrap();
    let expected = dir.path().join(EXPECTED_DIR);
    fs::create_dir_all(&expected).unwrap();
    fs::write(expected.join("stale.js"), "old").unwrap();

    let files = accept_output(dir.path()).unwrap();
    assert_eq!(files, ["assets/a.css", "index.js"]);
    assert_eq!(list_files(&expected).unwrap(), files);
    assert_eq!(fs::read_to_string(expected.join("index.js")).unwrap(), "new");
    assert!(afpack_core::verify_build_result(dir.path()).unwrap().is_match());
  }
}
