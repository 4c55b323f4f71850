use crate::domain::model::ContentBundle;
use crate::domain::ports::ContentSource;
use crate::utils::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Reads the content bundle from a JSON file on disk.
#[derive(Debug, Clone)]
pub struct LocalContent {
    path: PathBuf,
}

impl LocalContent {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ContentSource for LocalContent {
    fn load(&self) -> Result<ContentBundle> {
        let data = fs::read(&self.path)?;
        let bundle: ContentBundle = serde_json::from_slice(&data)?;
        tracing::debug!(
            "Loaded {} testimonials, {} packages, {} portfolio items, {} services from {}",
            bundle.testimonials.len(),
            bundle.packages.len(),
            bundle.portfolio.len(),
            bundle.services.len(),
            self.path.display()
        );
        Ok(bundle)
    }
}
