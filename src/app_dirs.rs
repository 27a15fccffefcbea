use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "luminate";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    fn project() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", APP_NAME)
    }

    /// Progress database under `$HOME/.local/state/luminate`
    pub fn store_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join(APP_NAME);
            Some(state_dir.join("progress.db"))
        } else {
            Self::project().map(|proj_dirs| proj_dirs.data_local_dir().join("progress.db"))
        }
    }

    pub fn config_path() -> Option<PathBuf> {
        Self::project().map(|proj_dirs| proj_dirs.config_dir().join("config.json"))
    }

    pub fn log_dir() -> PathBuf {
        Self::project()
            .map(|proj_dirs| proj_dirs.data_local_dir().join("logs"))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_named_for_the_app() {
        if let Some(path) = AppDirs::store_path() {
            assert!(path.ends_with("progress.db"));
            assert!(path.to_string_lossy().contains(APP_NAME));
        }
        if let Some(path) = AppDirs::config_path() {
            assert!(path.ends_with("config.json"));
        }
    }
}
