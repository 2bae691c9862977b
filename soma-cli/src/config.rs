//! Environment loading
//!
//! `.env` files are read before argument parsing, in priority order:
//! 1. Variables already set in the process environment
//! 2. `./.env` (current directory or a parent)
//! 3. `~/.soma-analytics/.env`
//!
//! dotenvy never overwrites a variable that is already set, so loading in
//! this order gives the priority above.

use std::path::PathBuf;

use tracing::{debug, info};

/// Load `.env` files and return where configuration came from.
///
/// Runs before tracing is initialised, so it only collects sources; call
/// [`log_env_sources`] once logging is up.
pub fn load_dotenv() -> Vec<PathBuf> {
    let mut loaded_from = Vec::new();

    if let Ok(path) = dotenvy::dotenv() {
        loaded_from.push(path);
    }

    if let Some(env_file) = config_dir().map(|dir| dir.join(".env")) {
        if env_file.exists() && dotenvy::from_path(&env_file).is_ok() {
            loaded_from.push(env_file);
        }
    }

    loaded_from
}

/// Log the sources returned by [`load_dotenv`].
pub fn log_env_sources(sources: &[PathBuf]) {
    if sources.is_empty() {
        info!("Using environment variables only (no .env file found)");
        return;
    }

    for path in sources {
        debug!("Loaded .env from {}", path.display());
    }
    info!(
        "Loaded configuration from: {}",
        sources
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
}

/// Per-user config directory (`~/.soma-analytics`)
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".soma-analytics"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_dir_is_under_home() {
        if let (Some(dir), Some(home)) = (config_dir(), dirs::home_dir()) {
            assert_eq!(dir, home.join(".soma-analytics"));
        }
    }
}
