use directories::ProjectDirs;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "sheetquiz";

/// File locations for stats and config
pub struct AppDirs;

impl AppDirs {
    /// `$HOME/.local/state/sheetquiz`, or the platform data-local dir when HOME is unset
    pub fn state_dir() -> Option<PathBuf> {
        match std::env::var_os("HOME") {
            Some(home) if !home.is_empty() => Some(state_dir_under(Path::new(&home))),
            _ => project_dirs().map(|pd| pd.data_local_dir().to_path_buf()),
        }
    }

    pub fn db_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join("stats.db"))
    }

    pub fn config_path() -> Option<PathBuf> {
        project_dirs().map(|pd| pd.config_dir().join("config.json"))
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", APP_NAME)
}

fn state_dir_under(home: &Path) -> PathBuf {
    home.join(".local").join("state").join(APP_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_dir_under_home() {
        assert_eq!(
            state_dir_under(Path::new("/home/kana")),
            PathBuf::from("/home/kana/.local/state/sheetquiz")
        );
    }

    #[test]
    fn test_file_names() {
        if let Some(db) = AppDirs::db_path() {
            assert!(db.ends_with("sheetquiz/stats.db"));
        }
        if let Some(cfg) = AppDirs::config_path() {
            assert_eq!(cfg.file_name().and_then(|n| n.to_str()), Some("config.json"));
        }
    }
}
