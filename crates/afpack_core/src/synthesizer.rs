use std::{collections::BTreeMap, fmt::Debug, path::PathBuf};

use afpack_error::Error;
use serde_json::Value;
use sugar_path::SugarPath;

use crate::{
  BuildEnv, BuildOptions, BuildResult, BundlerConfig, Mode, OutputConfig, CWD_KEY,
  DISABLE_CSS_MODULES_KEY, DIST_DIR, OUTPUT_PATH_KEY,
};

/// Turns merged build options into a complete [BundlerConfig].
pub trait ConfigSynthesizer: Debug + Send + Sync {
  fn synthesize(&self, opts: BuildOptions, env: &BuildEnv) -> BuildResult<BundlerConfig>;
}

/// Understands a handful of well-known options and forwards the rest untouched.
///
/// | key                 | type                  | effect                                 |
/// |---------------------|-----------------------|----------------------------------------|
/// | `cwd`               | string, required      | `context`                              |
/// | `outputPath`        | string                | `output.path`, defaults to `cwd/dist`  |
/// | `disableCSSModules` | bool                  | `cssModules = !disableCSSModules`      |
/// | `publicPath`        | string                | `output.publicPath`, defaults to `/`   |
/// | `hash`              | bool                  | hashed `output.filename`               |
/// | `entry`             | object of strings     | initial `entry`                        |
#[derive(Debug, Default, Clone)]
pub struct DefaultConfigSynthesizer;

const PUBLIC_PATH_KEY: &str = "publicPath";
const HASH_KEY: &str = "hash";
const ENTRY_KEY: &str = "entry";

impl ConfigSynthesizer for DefaultConfigSynthesizer {
  fn synthesize(&self, mut opts: BuildOptions, env: &BuildEnv) -> BuildResult<BundlerConfig> {
    let context = opts
      .take_str(CWD_KEY)?
      .map(PathBuf::from)
      .ok_or_else(|| Error::invalid_option(CWD_KEY, "a string"))?;
    let output_path = opts
      .take_str(OUTPUT_PATH_KEY)?
      .map(PathBuf::from)
      .unwrap_or_else(|| context.join(DIST_DIR));
    let css_modules = !opts.take_bool(DISABLE_CSS_MODULES_KEY)?.unwrap_or(false);
    let public_path = opts
      .take_str(PUBLIC_PATH_KEY)?
      .unwrap_or_else(|| "/".to_string());
    let filename = if opts.take_bool(HASH_KEY)?.unwrap_or(false) {
      "[name].[chunkhash:8].js"
    } else {
      "[name].js"
    };
    let entry: BTreeMap<String, PathBuf> = match opts.remove(ENTRY_KEY) {
      None | Some(Value::Null) => BTreeMap::new(),
      Some(Value::Object(map)) => map
        .into_iter()
        .map(|(name, path)| match path {
          Value::String(path) => Ok((name, context.join(path).normalize())),
          _ => Err(Error::invalid_option(ENTRY_KEY, "an object of strings")),
        })
        .collect::<BuildResult<_>>()?,
      Some(_) => return Err(Error::invalid_option(ENTRY_KEY, "an object of strings")),
    };

    Ok(BundlerConfig {
      mode: env.mode,
      context,
      entry,
      output: OutputConfig {
        path: output_path,
        filename: filename.to_string(),
        public_path,
      },
      css_modules,
      compress: env.compress,
      minimize: env.mode == Mode::Production && env.compress,
      extra: opts.into_map(),
    })
  }
}
