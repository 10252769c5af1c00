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

//! Directory browser state.
//!
//! Lists one directory at a time as a fixed list of [`BrowserEntry`]
//! values, filtered by extension. Walking into a directory simply produces a
//! new listing; nothing is kept between directories except the path.

use std::{
    cmp::Ordering,
    env,
    path::{Path, PathBuf},
};

use log::debug;
use ratatui::widgets::ListState;
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum BrowserEntry {
    Parent,
    /// Choose the directory being viewed.
    ThisDirectory,
    Directory(String),
    File(String),
}

impl BrowserEntry {
    pub(crate) fn label(&self) -> &str {
        match self {
            BrowserEntry::Parent => "..",
            BrowserEntry::ThisDirectory => "<this directory>",
            BrowserEntry::Directory(name) | BrowserEntry::File(name) => name,
        }
    }
}

/// What picking an entry means for the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum BrowserOutcome {
    /// The listing changed; keep browsing.
    Listed,
    /// Stay where we are.
    Stay,
    Chosen(PathBuf),
}

fn matches_extension(name: &str, extensions: &[&str]) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| extensions.iter().any(|x| e.eq_ignore_ascii_case(x)))
}

/// Lists `dir` the way the browser shows it: `..`, then `<this directory>`
/// when directories may be chosen, then sub-directories and matching files
/// sorted by name.
pub(crate) fn list_directory(dir: &Path, extensions: &[&str], select_dir: bool) -> Vec<BrowserEntry> {
    let mut entries = vec![BrowserEntry::Parent];
    if select_dir {
        entries.push(BrowserEntry::ThisDirectory);
    }

    let mut found: Vec<BrowserEntry> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter_map(|e| {
            let name = e.file_name().to_str()?.to_string();
            if e.file_type().is_dir() {
                Some(BrowserEntry::Directory(name))
            } else if matches_extension(&name, extensions) {
                Some(BrowserEntry::File(name))
            } else {
                None
            }
        })
        .collect();
    found.sort_by(|a, b| compare_names(a.label(), b.label()));

    entries.extend(found);
    entries
}

#[cfg(unix)]
fn compare_names(a: &str, b: &str) -> Ordering {
    a.cmp(b)
}

#[cfg(not(unix))]
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

fn home_dir() -> PathBuf {
    env::var_os("HOME")
        .or_else(|| env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("/"))
}

/// Works out where browsing starts.
///
/// A relative `path` is taken relative to `base`. The nearest existing
/// directory at or above it is used, or the user's home directory when
/// there is none.
pub(crate) fn resolve_start(path: &str, base: &Path) -> PathBuf {
    if path.is_empty() {
        return base.to_path_buf();
    }

    let mut candidate = Path::new(path).to_path_buf();
    if candidate.is_relative() {
        candidate = base.join(candidate);
    }

    let mut current: Option<&Path> = Some(&candidate);
    while let Some(dir) = current {
        if dir.is_dir() {
            return dir.to_path_buf();
        }
        current = dir.parent();
    }

    home_dir()
}

pub(crate) struct DirectoryBrowser {
    dir: PathBuf,
    extensions: Vec<&'static str>,
    select_dir: bool,
    entries: Vec<BrowserEntry>,
    pub(crate) state: ListState,
}

impl DirectoryBrowser {
    pub(crate) fn new(start: PathBuf, extensions: &[&'static str], select_dir: bool) -> Self {
        let mut browser = Self {
            dir: start,
            extensions: extensions.to_vec(),
            select_dir,
            entries: Vec::new(),
            state: ListState::default(),
        };
        browser.relist();
        browser
    }

    pub(crate) fn dir(&self) -> &Path {
        &self.dir
    }

    pub(crate) fn entries(&self) -> &[BrowserEntry] {
        &self.entries
    }

    pub(crate) fn selected(&self) -> Option<usize> {
        self.state.selected()
    }

    pub(crate) fn select(&mut self, index: usize) {
        if index < self.entries.len() {
            self.state.select(Some(index));
        }
    }

    fn relist(&mut self) {
        debug!("Listing {}", self.dir.display());
        self.entries = list_directory(&self.dir, &self.extensions, self.select_dir);
        self.state.select(Some(0));
    }

    pub(crate) fn next(&mut self) {
        let len = self.entries.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            Some(_) => 0,
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub(crate) fn previous(&mut self) {
        let len = self.entries.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    /// Acts on the highlighted entry.
    pub(crate) fn choose(&mut self) -> BrowserOutcome {
        let Some(entry) = self.selected().and_then(|i| self.entries.get(i)).cloned() else {
            return BrowserOutcome::Stay;
        };

        match entry {
            BrowserEntry::Parent => match self.dir.parent() {
                Some(parent) => {
                    self.dir = parent.to_path_buf();
                    self.relist();
                    BrowserOutcome::Listed
                }
                // Already at the root.
                None => BrowserOutcome::Stay,
            },
            BrowserEntry::ThisDirectory => BrowserOutcome::Chosen(self.dir.clone()),
            BrowserEntry::Directory(name) => {
                let target = self.dir.join(name);
                if target.is_dir() {
                    self.dir = target;
                    self.relist();
                    BrowserOutcome::Listed
                } else {
                    BrowserOutcome::Stay
                }
            }
            BrowserEntry::File(name) => BrowserOutcome::Chosen(self.dir.join(name)),
        }
    }
}
