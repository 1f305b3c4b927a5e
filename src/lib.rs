//! tinyblog: a small blog backed by an embedded key-value store
//!
//! Posts are stored in a single redb file keyed by slug and rendered from
//! markdown into sanitized HTML whenever they are displayed.

pub mod commands;
pub mod config;
pub mod content;
pub mod server;
pub mod store;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// The main blog application
#[derive(Debug, Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Database file
    pub db_path: PathBuf,
}

impl Blog {
    /// Create a new Blog instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let db_path = base_dir.join(&config.db_path);

        Ok(Self {
            config,
            base_dir,
            db_path,
        })
    }

    /// Use a different database file
    pub fn with_db_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.db_path = self.base_dir.join(path);
        self
    }

    /// Open (or create) the post store
    pub fn open_store(&self) -> Result<store::PostStore> {
        let store = store::PostStore::open(&self.db_path)?;
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        assert_eq!(blog.config.title, "Tiny Blog");
        assert_eq!(blog.db_path, dir.path().join("tinyblog.db"));
    }

    #[test]
    fn test_config_file_sets_db_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("_config.yml"), "db_path: data.db\n").unwrap();

        let blog = Blog::new(dir.path()).unwrap();
        assert_eq!(blog.db_path, dir.path().join("data.db"));

        let blog = blog.with_db_path("other.db");
        assert_eq!(blog.db_path, dir.path().join("other.db"));
        blog.open_store().unwrap();
        assert!(dir.path().join("other.db").exists());
    }
}
