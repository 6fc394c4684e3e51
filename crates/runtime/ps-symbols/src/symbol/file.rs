//! File handles over a [`FileStore`]

use crate::error::{SymbolError, SymbolResult};
use ps_span::Line;
use ps_vfs::FileStore;
use std::fmt;

/// How a file was opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileMode {
    /// Line-by-line reading of existing content
    Read,
    /// Writing from empty; existing content is discarded on open
    Write,
    /// Writing after existing content; the file is created if absent
    Append,
}

impl FileMode {
    /// Parse a mode keyword (`READ`, `WRITE`, `APPEND`) or its one-letter
    /// short form, ignoring case
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        match text.to_ascii_lowercase().as_str() {
            "read" | "r" => Some(Self::Read),
            "write" | "w" => Some(Self::Write),
            "append" | "a" => Some(Self::Append),
            _ => None,
        }
    }
}

impl fmt::Display for FileMode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Read => "READ",
            Self::Write => "WRITE",
            Self::Append => "APPEND",
        };
        formatter.write_str(text)
    }
}

/// An open file
///
/// In read mode the whole file is fetched once at open time and served from
/// memory afterwards. Writes go straight through to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    name: String,
    mode: FileMode,
    lines: Vec<String>,
    next: usize,
    eof: bool,
    line: Line,
}

impl FileHandle {
    /// Open `name` in `mode`
    ///
    /// # Errors
    ///
    /// In read mode, returns the store's `NotFound` if the file has no
    /// content. Any other store failure is passed through.
    pub fn open(name: impl Into<String>, mode: FileMode, store: &dyn FileStore, line: Line) -> SymbolResult<Self> {
        let name = name.into();
        let lines = match mode {
            FileMode::Read => store.read(&name)?.lines().map(str::to_string).collect(),
            FileMode::Write => {
                store.write(&name, "")?;
                Vec::new()
            }
            FileMode::Append => {
                store.append(&name, "")?;
                Vec::new()
            }
        };
        log::debug!("opened file '{name}' for {mode} at {line}");
        Ok(Self {
            name,
            mode,
            lines,
            next: 0,
            eof: false,
            line,
        })
    }

    /// File name, also the key into the store
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Open mode
    #[must_use]
    pub const fn mode(&self) -> FileMode {
        self.mode
    }

    /// Line of the open statement
    #[must_use]
    pub const fn line(&self) -> Line {
        self.line
    }

    /// Whether a read has already run past the last line
    #[must_use]
    pub const fn hit_eof(&self) -> bool {
        self.eof
    }

    fn mode_violation(&self, operation: &'static str, line: Line) -> SymbolError {
        SymbolError::ModeViolation {
            name: self.name.clone(),
            mode: self.mode,
            operation,
            line,
        }
    }

    /// Next line of the file
    ///
    /// # Errors
    ///
    /// Returns `ModeViolation` unless opened for reading and `EndOfFile` once
    /// every line has been read.
    pub fn read_line(&mut self, line: Line) -> SymbolResult<String> {
        if self.mode != FileMode::Read {
            return Err(self.mode_violation("read", line));
        }
        let Some(text) = self.lines.get(self.next) else {
            self.eof = true;
            return Err(SymbolError::EndOfFile {
                name: self.name.clone(),
                line,
            });
        };
        let text = text.clone();
        self.next += 1;
        Ok(text)
    }

    /// Append `text` as a line of the file
    ///
    /// # Errors
    ///
    /// Returns `ModeViolation` for read handles; store failures are passed
    /// through.
    pub fn write_line(&mut self, text: &str, store: &dyn FileStore, line: Line) -> SymbolResult<()> {
        if self.mode == FileMode::Read {
            return Err(self.mode_violation("write", line));
        }
        store.append(&self.name, &format!("{text}\n"))?;
        Ok(())
    }

    /// Whether every line has been read
    ///
    /// Write and append handles are always positioned at the end.
    #[must_use]
    pub fn at_end(&self) -> bool {
        match self.mode {
            FileMode::Read => self.next >= self.lines.len(),
            FileMode::Write | FileMode::Append => true,
        }
    }
}

impl fmt::Display for FileHandle {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "FILE symbol name={} | mode={}", self.name, self.mode)?;
        if self.mode == FileMode::Read {
            write!(formatter, " | line={}/{}", self.next, self.lines.len())?;
        }
        Ok(())
    }
}
