//! On-disk test fixtures.
//!
//! Every fixture lives in its own temporary directory which is removed when
//! the fixture is dropped.

use std::io;
use std::path::PathBuf;
use tempfile::TempDir;

/// A temporary directory holding files written by a test.
#[derive(Debug)]
pub struct FileFixture {
    dir: TempDir,
}

impl FileFixture {
    /// Create an empty fixture directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary directory cannot be created.
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            dir: TempDir::new()?,
        })
    }

    /// Write `contents` to `name` inside the fixture and return its path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write(&self, name: &str, contents: impl AsRef<[u8]>) -> io::Result<PathBuf> {
        let path = self.dir.path().join(name);
        std::fs::write(&path, contents)?;
        Ok(path)
    }

    /// Write a `login:password` file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn login_file(&self, login: &str, password: &str) -> io::Result<PathBuf> {
        self.write("login", format!("{login}:{password}\n"))
    }

    /// A path inside the fixture that does not exist.
    #[must_use]
    pub fn missing(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}
