use std::{
  borrow::Cow,
  ffi::OsString,
  io::Write,
  path::{Path, PathBuf},
  process::Stdio,
  time::Duration,
};

use afpack_error::Error;
use tokio::process::Command;

use crate::{BuildResult, Bundler, BundlerConfig, BundlerName, BundlerOutput, NODE_ENV, NO_COMPRESS};

/// Placeholder in [CommandBundler] arguments that is replaced with the config file path.
pub const CONFIG_PLACEHOLDER: &str = "{config}";
pub const CONFIG_ENV: &str = "AFPACK_CONFIG";
pub const OUTPUT_PATH_ENV: &str = "AFPACK_OUTPUT_PATH";

/// Runs an external program as the bundler.
///
/// The synthesized config is written to a temporary JSON file whose path is
/// passed through `{config}` in the arguments and through `AFPACK_CONFIG`.
/// The child runs inside the config's `context` directory with `NODE_ENV`
/// and `NO_COMPRESS` derived from the config.
#[derive(Debug, Clone)]
pub struct CommandBundler {
  program: OsString,
  args: Vec<String>,
  timeout: Option<Duration>,
}

impl CommandBundler {
  pub fn new(program: impl Into<OsString>) -> Self {
    Self {
      program: program.into(),
      args: vec![],
      timeout: None,
    }
  }

  pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
    self.args.extend(args.into_iter().map(Into::into));
    self
  }

  pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
    self.timeout = timeout;
    self
  }

  fn command(&self, config: &BundlerConfig, config_path: &Path) -> Command {
    let config_arg = config_path.to_string_lossy();
    let mut cmd = Command::new(&self.program);
    cmd
      .args(
        self
          .args
          .iter()
          .map(|arg| arg.replace(CONFIG_PLACEHOLDER, &config_arg)),
      )
      .current_dir(&config.context)
      .env(NODE_ENV, config.mode.as_str())
      .env(CONFIG_ENV, config_path)
      .env(OUTPUT_PATH_ENV, &config.output.path)
      .stdin(Stdio::null())
      .stdout(Stdio::piped())
      .stderr(Stdio::piped())
      .kill_on_drop(true);
    if config.compress {
      cmd.env_remove(NO_COMPRESS);
    } else {
      cmd.env(NO_COMPRESS, "1");
    }
    cmd
  }

  fn display_program(&self) -> String {
    PathBuf::from(&self.program).display().to_string()
  }
}

#[async_trait::async_trait]
impl Bundler for CommandBundler {
  fn name(&self) -> BundlerName {
    Cow::Owned(self.display_program())
  }

  async fn run(&self, config: &BundlerConfig) -> BuildResult<BundlerOutput> {
    let mut config_file = tempfile::Builder::new()
      .prefix("afpack-config-")
      .suffix(".json")
      .tempfile()?;
    serde_json::to_writer_pretty(&mut config_file, config)
      .map_err(|e| Error::panic(format!("Failed to serialize bundler config: {e}")))?;
    config_file.flush()?;

    let child = self
      .command(config, config_file.path())
      .spawn()
      .map_err(|e| Error::compilation(format!("could not start `{}`: {e}", self.display_program())))?;

    let output = match self.timeout {
      Some(timeout) => tokio::time::timeout(timeout, child.wait_with_output())
        .await
        .map_err(|_| {
          Error::compilation(format!(
            "`{}` did not finish within {:?}",
            self.display_program(),
            timeout
          ))
        })??,
      None => child.wait_with_output().await?,
    };

    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.trim().is_empty() {
      tracing::debug!("{}", stdout.trim_end());
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !output.status.success() {
      return Err(Error::compilation(format!(
        "`{}` exited with {}: {}",
        self.display_program(),
        output.status,
        stderr.trim()
      )));
    }

    Ok(BundlerOutput {
      warnings: stderr
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToString::to_string)
        .collect(),
    })
  }
}
