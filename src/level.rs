use crate::error::BloxorzError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Tokenized level text: one string of concatenated feature codes per cell
///
/// Format:
/// - blank lines are ignored
/// - cells are separated by whitespace
/// - each cell is one or more 3-character feature codes (see `Feature::parse`)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

impl Level {
    /// Tokenize level text. Rows must all have the same number of cells.
    pub fn parse(name: &str, text: &str) -> Result<Level, BloxorzError> {
        let rows: Vec<Vec<String>> = text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| line.split_whitespace().map(str::to_string).collect())
            .collect();

        if rows.is_empty() {
            return Err(BloxorzError::malformed(format!("level '{}' has no rows", name)));
        }

        let width = rows[0].len();
        if let Some((y, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != width) {
            return Err(BloxorzError::malformed(format!(
                "level '{}' row {} has {} cells, expected {}",
                name,
                y,
                row.len(),
                width
            )));
        }

        Ok(Level { name: name.to_string(), rows })
    }

    /// Load a level from a text file; the file stem becomes the level name
    pub fn load_from_file(path: &Path) -> Result<Level, BloxorzError> {
        let text = fs::read_to_string(path).map_err(|source| BloxorzError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("level");
        Level::parse(name, &text)
    }

    /// Path of a numbered stage inside a stages directory
    pub fn stage_path(dir: &Path, stage: u32) -> PathBuf {
        dir.join(format!("stage_{}.txt", stage))
    }

    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, |row| row.len())
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }
}
