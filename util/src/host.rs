//! Host platform utility functions

use std::env;
use std::path::PathBuf;

/// Name of the environment variable pointing at the software root.
pub const SW_ROOT_ENV_VAR: &str = "WPU_SW_ROOT";

/// Retrieve the software root directory from the `WPU_SW_ROOT` environment
/// variable.
pub fn get_wpu_sw_root() -> Result<PathBuf, env::VarError> {
    env::var(SW_ROOT_ENV_VAR).map(PathBuf::from)
}
