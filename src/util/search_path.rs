// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.


//! Case-insensitive lookup of game data files.
//!
//! Data files ship with whatever case the original media used, so names are
//! matched without regard to case inside each search directory. Directories
//! are tried in the order given; the first match wins.

use std::{
    fs,
    path::{Path, PathBuf},
};

use walkdir::WalkDir;

#[derive(Debug, Clone, Default)]
pub(crate) struct SearchPath {
    dirs: Vec<PathBuf>,
}

impl SearchPath {
    pub(crate) fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    /// Finds `name` in the search directories.
    ///
    /// Absolute names are returned as-is when they exist. Names containing a
    /// directory separator are only matched exactly.
    pub(crate) fn resolve(&self, name: &str) -> Option<PathBuf> {
        if name.is_empty() {
            return None;
        }

        let path = Path::new(name);
        if path.is_absolute() {
            return path.is_file().then(|| path.to_path_buf());
        }

        for dir in &self.dirs {
            let exact = dir.join(path);
            if exact.is_file() {
                return Some(exact);
            }

            if path.components().count() == 1
                && let Some(found) = find_ignoring_case(dir, name)
            {
                return Some(found);
            }
        }

        None
    }

    pub(crate) fn exists(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    pub(crate) fn file_size(&self, name: &str) -> Option<u64> {
        let path = self.resolve(name)?;
        fs::metadata(path).ok().map(|m| m.len())
    }

    pub(crate) fn read_to_string(&self, name: &str) -> Option<String> {
        let path = self.resolve(name)?;
        let bytes = fs::read(path).ok()?;
        Some(String::from_utf8_lossy(&bytes).into_owned())
    }
}

fn find_ignoring_case(dir: &Path, name: &str) -> Option<PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .find(|e| e.file_name().to_string_lossy().eq_ignore_ascii_case(name))
        .map(|e| e.into_path())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn names_match_without_case() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("GAME01.HMP"), b"x").unwrap();

        let search = SearchPath::new(vec![dir.path().to_path_buf()]);

        assert_eq!(search.resolve("game01.hmp"), Some(dir.path().join("GAME01.HMP")));
        assert!(search.exists("Game01.hmp"));
        assert!(!search.exists("game02.hmp"));
        assert!(!search.exists(""));
    }

    #[test]
    fn earlier_directories_win() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        fs::write(first.path().join("descent.sng"), b"first").unwrap();
        fs::write(second.path().join("descent.sng"), b"second!").unwrap();

        let search = SearchPath::new(vec![first.path().to_path_buf(), second.path().to_path_buf()]);

        assert_eq!(search.read_to_string("descent.sng").as_deref(), Some("first"));
        assert_eq!(search.file_size("descent.sng"), Some(5));
    }

    #[test]
    fn absolute_names_bypass_search_dirs() {
        let dir = TempDir::new().unwrap();
        let song = dir.path().join("title.ogg");
        fs::write(&song, b"x").unwrap();

        let search = SearchPath::new(Vec::new());

        assert_eq!(search.resolve(song.to_str().unwrap()), Some(song));
    }
}
