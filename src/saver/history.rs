/*
history.rs

Copyright 2025 Hervé Quatremain

This file is part of Mazewise.

Mazewise is free software: you can redistribute it and/or modify it under the
terms of the GNU General Public License as published by the Free Software
Foundation, either version 3 of the License, or (at your option) any later
version.

Mazewise is distributed in the hope that it will be useful, but WITHOUT ANY
WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
A PARTICULAR PURPOSE. See the GNU General Public License for more details.

You should have received a copy of the GNU General Public License along with
Mazewise. If not, see <https://www.gnu.org/licenses/>.

SPDX-License-Identifier: GPL-3.0-or-later
*/

//! Save and restore the performance history of the players.
//!
//! The history is stored as a single `history.json` file in the data directory.
//! Saving first writes a temporary file next to it and then renames it over the previous
//! history, so an interrupted save never leaves a truncated file behind.

use log::debug;
use std::error::Error;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::history::PerformanceHistory;

const HISTORY_FILE: &str = "history.json";
const TEMP_FILE: &str = ".history.json.tmp";

/// Persistent storage of a [`PerformanceHistory`] object.
pub struct SaverHistory {
    /// Directory that contains the history file.
    data_dir: PathBuf,
}

impl SaverHistory {
    /// Create a [`SaverHistory`] object that stores the history in `data_dir`.
    ///
    /// The directory does not need to exist yet: it is created on the first save.
    pub fn new(data_dir: PathBuf) -> Self {
        debug!("History directory: {data_dir:?}");
        Self { data_dir }
    }

    /// Path to the history file.
    pub fn path(&self) -> PathBuf {
        self.data_dir.join(HISTORY_FILE)
    }

    /// Load the history.
    ///
    /// Return None when nothing has been saved yet.
    pub fn get_history(&self) -> Result<Option<PerformanceHistory>, Box<dyn Error>> {
        let path: PathBuf = self.path();
        let file: File = match File::open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(format!("{}: {e}", path.display()).into()),
        };
        let history: PerformanceHistory = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| format!("{}: {e}", path.display()))?;
        debug!("History loaded from {path:?}");
        Ok(Some(history))
    }

    /// Save the history, replacing the previous one.
    pub fn save_history(&self, history: &PerformanceHistory) -> Result<(), Box<dyn Error>> {
        fs::create_dir_all(&self.data_dir)?;
        let temp: PathBuf = self.data_dir.join(TEMP_FILE);
        if let Err(e) = write_json(&temp, history) {
            let _ = fs::remove_file(&temp);
            return Err(e);
        }
        fs::rename(&temp, self.path())?;
        debug!("History saved to {:?}", self.path());
        Ok(())
    }

    /// Delete the history file. A missing file is not an error.
    pub fn delete_save(&self) -> Result<(), Box<dyn Error>> {
        match fs::remove_file(self.path()) {
            Ok(()) => {
                debug!("History file {:?} deleted", self.path());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Box::new(e)),
        }
    }
}

/// Serialize the history into a new file and flush it to disk.
fn write_json(path: &Path, history: &PerformanceHistory) -> Result<(), Box<dyn Error>> {
    let mut writer: BufWriter<File> = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, history)?;
    writer.flush()?;
    writer.get_ref().sync_all()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::performance::PerformanceRecord;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("mazewise-{}", uuid::Uuid::new_v4()))
    }

    fn sample_history() -> PerformanceHistory {
        let mut history = PerformanceHistory::new();
        history.add_record("alice", PerformanceRecord::new(true, 4, 16, 30.5, 19.5));
        history.add_record("alice", PerformanceRecord::new(false, 0, 22, 3.0, 13.0));
        history
    }

    #[test]
    fn test_missing_directory() {
        let saver = SaverHistory::new(temp_dir());
        assert!(saver.get_history().unwrap().is_none());
        saver.delete_save().unwrap();
    }

    #[test]
    fn test_save_creates_directory() {
        let dir = temp_dir().join("nested");
        let saver = SaverHistory::new(dir.clone());
        let history = sample_history();
        saver.save_history(&history).unwrap();

        assert!(saver.path().is_file());
        assert!(!dir.join(TEMP_FILE).exists());
        let restored = saver.get_history().unwrap().unwrap();
        assert_eq!(restored.get_records("alice"), history.get_records("alice"));
        fs::remove_dir_all(dir.parent().unwrap()).unwrap();
    }

    #[test]
    fn test_save_replaces_previous_history() {
        let dir = temp_dir();
        let saver = SaverHistory::new(dir.clone());
        saver.save_history(&sample_history()).unwrap();

        let mut history = PerformanceHistory::new();
        history.add_record("bob", PerformanceRecord::new(true, 1, 1, 5.0, 6.0));
        saver.save_history(&history).unwrap();

        let restored = saver.get_history().unwrap().unwrap();
        assert!(restored.get_records("alice").is_none());
        assert_eq!(restored.get_records("bob").unwrap().len(), 1);
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_delete_save() {
        let dir = temp_dir();
        let saver = SaverHistory::new(dir.clone());
        saver.save_history(&sample_history()).unwrap();

        saver.delete_save().unwrap();
        assert!(saver.get_history().unwrap().is_none());
        // Deleting twice is fine
        saver.delete_save().unwrap();
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_delete_save_reports_errors() {
        // The history path is a directory, which remove_file refuses
        let dir = temp_dir();
        fs::create_dir_all(dir.join(HISTORY_FILE)).unwrap();
        let saver = SaverHistory::new(dir.clone());
        assert!(saver.delete_save().is_err());
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_corrupted_file() {
        let dir = temp_dir();
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(HISTORY_FILE), "not json").unwrap();
        let saver = SaverHistory::new(dir.clone());
        let error = saver.get_history().unwrap_err().to_string();
        assert!(error.contains(HISTORY_FILE));
        fs::remove_dir_all(dir).unwrap();
    }
}
