use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Spreadsheet header labels, in the same order as the record fields
pub const COLUMNS: [&str; 5] = ["Preview", "Rating", "Name", "Description", "Year"];

/// One scraped movie.
///
/// Field order matches the spreadsheet column order. Records are built once by
/// the detail extractor and never mutated afterwards; only the containing
/// list gets reordered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieRecord {
    pub image_path: PathBuf,
    pub rating: String,
    pub title: String,
    pub description: String,
    pub year: i32,
}

impl MovieRecord {
    pub fn new(
        image_path: impl Into<PathBuf>,
        rating: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        year: i32,
    ) -> Self {
        Self {
            image_path: image_path.into(),
            rating: rating.into(),
            title: title.into(),
            description: description.into(),
            year,
        }
    }

    pub fn columns() -> &'static [&'static str; 5] {
        &COLUMNS
    }

    pub fn image_path(&self) -> &Path {
        &self.image_path
    }

    /// Load records from a JSON dump written by [`MovieRecord::save_json`]
    pub fn load_json<P: AsRef<Path>>(path: P) -> std::io::Result<Vec<MovieRecord>> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    pub fn save_json<P: AsRef<Path>>(records: &[MovieRecord], path: P) -> std::io::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(records)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }
}
