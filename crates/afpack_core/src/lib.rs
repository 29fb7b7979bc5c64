mod options;
pub use options::*;
mod entry;
pub use entry::*;
mod config_loader;
pub use config_loader::*;
mod bundler_config;
pub use bundler_config::*;
mod synthesizer;
pub use synthesizer::*;
mod bundler;
pub use bundler::*;
mod command_bundler;
pub use command_bundler::*;
mod verify;
pub use verify::*;

// public exports

pub type BuildResult<T> = afpack_error::Result<T>;
pub type BuildError = afpack_error::Error;
