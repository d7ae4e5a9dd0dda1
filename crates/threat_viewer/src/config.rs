use crate::error::{Result, ViewerError};
use std::{env, path::PathBuf};

const ENV_OUTPUT_DIR: &str = "THREAT_VIEWER_OUTPUT_DIR";
const DEFAULT_OUTPUT_DIR: &str = "figs";

#[derive(Debug, Clone)]
pub struct Config {
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(output_dir) = env::var(ENV_OUTPUT_DIR)
            && !output_dir.trim().is_empty()
        {
            let path = PathBuf::from(output_dir);

            if path.exists() && !path.is_dir() {
                return Err(ViewerError::InvalidConfiguration(format!(
                    "Output path is not a directory: {}",
                    path.display()
                )));
            }
            config.output_dir = path;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::{NamedTempFile, TempDir};

    // tests below share one process environment
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn with_env<F: FnOnce()>(value: Option<&str>, f: F) {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let orig = env::var(ENV_OUTPUT_DIR).ok();
        unsafe {
            match value {
                Some(v) => env::set_var(ENV_OUTPUT_DIR, v),
                None => env::remove_var(ENV_OUTPUT_DIR),
            }
        }
        f();
        unsafe {
            env::remove_var(ENV_OUTPUT_DIR);
            if let Some(v) = orig {
                env::set_var(ENV_OUTPUT_DIR, v);
            }
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.output_dir, PathBuf::from("figs"));
    }

    #[test]
    fn test_from_env_default() {
        with_env(None, || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.output_dir, PathBuf::from("figs"));
        });
    }

    #[test]
    fn test_from_env_blank_falls_back() {
        with_env(Some("   \t\n "), || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.output_dir, PathBuf::from("figs"));
        });
    }

    #[test]
    fn test_from_env_with_valid_output_dir() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().to_string_lossy().into_owned();
        with_env(Some(&path), || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.output_dir, PathBuf::from(&path));
        });
    }

    #[test]
    fn test_from_env_rejects_file() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_string_lossy().into_owned();
        with_env(Some(&path), || {
            assert!(matches!(
                Config::from_env(),
                Err(ViewerError::InvalidConfiguration(_))
            ));
        });
    }
}
