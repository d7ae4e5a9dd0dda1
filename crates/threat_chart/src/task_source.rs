use crate::csv_reader::read_records;
use crate::error::{ChartError, Result};
use crate::record::ThreatRecord;

use itertools::Itertools;
use std::path::{Path, PathBuf};

const TASK_EXTENSIONS: [&str; 2] = ["csv", "json"];

/// Supplies task names and the records of one task.
pub trait TaskSource {
    fn list_task_names(&self) -> Result<Vec<String>>;
    fn task_records(&self, name: &str) -> Result<Vec<ThreatRecord>>;
}

/// Tasks stored as `<name>.csv` or `<name>.json` files in one directory
#[derive(Debug, Clone)]
pub struct DirectoryTaskSource {
    root: PathBuf,
}

impl DirectoryTaskSource {
    pub fn new<P: Into<PathBuf>>(root: P) -> Result<Self> {
        let root = root.into();
        if !root.exists() {
            return Err(ChartError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Directory does not exist: {}", root.display()),
            )));
        }
        if !root.is_dir() {
            return Err(ChartError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Path is not a directory: {}", root.display()),
            )));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn task_path(&self, name: &str) -> Option<PathBuf> {
        // names never address files outside the root
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return None;
        }
        TASK_EXTENSIONS
            .iter()
            .map(|ext| self.root.join(format!("{name}.{ext}")))
            .find(|p| p.is_file())
    }
}

fn is_task_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| TASK_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
}

impl TaskSource for DirectoryTaskSource {
    fn list_task_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let path = entry?.path();
            if !is_task_file(&path) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        Ok(names.into_iter().sorted().dedup().collect())
    }

    fn task_records(&self, name: &str) -> Result<Vec<ThreatRecord>> {
        let path = self
            .task_path(name)
            .ok_or_else(|| ChartError::UnknownTask(name.to_string()))?;
        let records = read_records(&path)?;
        if records.is_empty() {
            log::warn!("Task '{}' has no records ({})", name, path.display());
        } else {
            log::info!("Loaded {} records for task '{}'", records.len(), name);
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("alpha.csv"),
            "country,year,severity\nUSA,2020,1\nChina,2021,2\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("beta.json"),
            r#"[{"country":"India","discovery_date":"2022-01-01 00:00:00","risk_level":4}]"#,
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "not a task").unwrap();
        fs::create_dir(dir.path().join("nested.csv")).unwrap();
        dir
    }

    #[test]
    fn test_list_task_names() {
        let dir = fixture();
        let source = DirectoryTaskSource::new(dir.path()).unwrap();
        assert_eq!(source.list_task_names().unwrap(), vec!["alpha", "beta"]);
    }

    #[test]
    fn test_task_records() {
        let dir = fixture();
        let source = DirectoryTaskSource::new(dir.path()).unwrap();
        assert_eq!(source.task_records("alpha").unwrap().len(), 2);
        assert_eq!(
            source.task_records("beta").unwrap(),
            vec![ThreatRecord::new("India", 2022, 4)]
        );
    }

    #[test]
    fn test_unknown_task() {
        let dir = fixture();
        let source = DirectoryTaskSource::new(dir.path()).unwrap();
        assert!(matches!(
            source.task_records("gamma"),
            Err(ChartError::UnknownTask(_))
        ));
        assert!(matches!(
            source.task_records("../alpha"),
            Err(ChartError::UnknownTask(_))
        ));
    }

    #[test]
    fn test_missing_directory() {
        let dir = TempDir::new().unwrap();
        assert!(DirectoryTaskSource::new(dir.path().join("missing")).is_err());
    }
}
