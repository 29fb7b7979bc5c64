#![cfg(unix)]

use std::{fs, path::Path, time::Duration};

use afpack_core::{
  execute, BuildEnv, BuildOptions, BundlerConfig, CommandBundler, ConfigSynthesizer,
  DefaultConfigSynthesizer, Mode,
};

fn fixture_config(cwd: &Path, env: BuildEnv) -> BundlerConfig {
  let mut config = DefaultConfigSynthesizer
    .synthesize(BuildOptions::for_fixture(cwd), &env)
    .unwrap();
  config.set_entry(cwd.join("index.js"));
  config
}

fn sh(script: &str) -> CommandBundler {
  CommandBundler::new("sh").args(["-c", script])
}

#[tokio::test]
async fn runs_inside_fixture_with_env() {
  let dir = tempfile::tempdir().unwrap();
  fs::write(dir.path().join("index.js"), "export const a = 1;\n").unwrap();
  let config = fixture_config(dir.path(), BuildEnv::default());

  let bundler = sh(r#"mkdir -p "$AFPACK_OUTPUT_PATH" && cp index.js "$AFPACK_OUTPUT_PATH/index.js" && printf '%s %s' "$NODE_ENV" "$NO_COMPRESS" > "$AFPACK_OUTPUT_PATH/env.txt""#);
  let stats = execute(&bundler, &config).await.unwrap();
  assert!(stats.warnings.is_empty());

  let dist = dir.path().join("dist");
  assert_eq!(
    fs::read_to_string(dist.join("index.js")).unwrap(),
    "export const a = 1;\n"
  );
  assert_eq!(fs::read_to_string(dist.join("env.txt")).unwrap(), "production 1");
}

#[tokio::test]
async fn config_file_is_passed_by_placeholder() {
  let dir = tempfile::tempdir().unwrap();
  let config = fixture_config(dir.path(), BuildEnv::default());

  let bundler = CommandBundler::new("sh").args([
    "-c",
    r#"mkdir -p "$AFPACK_OUTPUT_PATH" && cp "$1" "$AFPACK_OUTPUT_PATH/config.json""#,
    "sh",
    "{config}",
  ]);
  execute(&bundler, &config).await.unwrap();

  let written: BundlerConfig = serde_json::from_str(
    &fs::read_to_string(dir.path().join("dist/config.json")).unwrap(),
  )
  .unwrap();
  assert_eq!(written, config);
}

#[tokio::test]
async fn stderr_of_successful_run_becomes_warnings() {
  let dir = tempfile::tempdir().unwrap();
  let config = fixture_config(
    dir.path(),
    BuildEnv {
      mode: Mode::Development,
      compress: true,
    },
  );
  let bundler = sh(r#"echo "size limit exceeded" >&2; echo "$NODE_ENV" >&2"#);
  let stats = execute(&bundler, &config).await.unwrap();
  assert_eq!(stats.warnings, ["size limit exceeded", "development"]);
}

#[tokio::test]
async fn failing_bundler_is_a_compilation_error() {
  let dir = tempfile::tempdir().unwrap();
  let config = fixture_config(dir.path(), BuildEnv::default());
  let err = execute(&sh("echo 'Module not found: ./missing' >&2; exit 2"), &config)
    .await
    .unwrap_err();
  assert_eq!(err.kind.code(), "COMPILATION");
  assert!(err.to_string().contains("Module not found: ./missing"));
}

#[tokio::test]
async fn missing_program_is_a_compilation_error() {
  let dir = tempfile::tempdir().unwrap();
  let config = fixture_config(dir.path(), BuildEnv::default());
  let err = execute(&CommandBundler::new("afpack-no-such-bundler"), &config)
    .await
    .unwrap_err();
  assert_eq!(err.kind.code(), "COMPILATION");
}

#[tokio::test]
async fn hanging_bundler_times_out() {
  let dir = tempfile::tempdir().unwrap();
  let config = fixture_config(dir.path(), BuildEnv::default());
  let bundler = sh("sleep 5").timeout(Some(Duration::from_millis(100)));
  let err = execute(&bundler, &config).await.unwrap_err();
  assert_eq!(err.kind.code(), "COMPILATION");
  assert!(err.to_string().contains("did not finish"));
}

#[tokio::test]
async fn no_compress_follows_the_compress_flag_in_every_mode() {
  let cases = [
    (Mode::Development, false, "development|1"),
    (Mode::Development, true, "development|unset"),
    (Mode::Production, false, "production|1"),
    (Mode::Production, true, "production|unset"),
  ];
  for (mode, compress, seen) in cases {
    let dir = tempfile::tempdir().unwrap();
    let config = fixture_config(dir.path(), BuildEnv { mode, compress });
    assert_eq!(config.compress, compress);
    let bundler = sh(r#"printf '%s|%s' "$NODE_ENV" "${NO_COMPRESS-unset}" >&2"#);
    let stats = execute(&bundler, &config).await.unwrap();
    assert_eq!(stats.warnings, [seen], "{mode:?} compress={compress}");
  }
}
