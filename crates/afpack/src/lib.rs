mod accept;
mod fixture;
mod report;
mod runner;
pub use {
  accept::accept_output,
  afpack_core::{
    execute, list_files, load_build_options, resolve_entry, verify_build_result, verify_dirs,
    BuildEnv, BuildOptions, BuildResult, BuildStats, Bundler, BundlerConfig, BundlerName,
    BundlerOutput, CommandBundler, ConfigSynthesizer, DefaultConfigSynthesizer, EntryResolver,
    Mode, OutputConfig, Verification, CONFIG_FILE_NAME, DIST_DIR, EXPECTED_DIR,
  },
  afpack_error::{Error, ErrorKind, Mismatch},
  fixture::{discover_fixtures, Fixture, FixtureFilter, DEFAULT_FOCUS_MARKER},
  report::{Outcome, Report},
  runner::FixtureRunner,
};
