//! I/O-bound workload: write a file, read it back, delete it.
//!
//! Each input is a byte count. The worker writes that many bytes to a fresh file in its
//! working directory, reads the file back, removes it, and emits the number of bytes
//! read. Every write byte is `size % 256`, so a short or corrupted read is detectable.

use anyhow::{Context, bail};
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use super::Workload;

/// Write-read-delete round trip through the filesystem.
#[derive(Debug)]
pub struct FileRoundTrip {
    dir: PathBuf,
    prefix: String,
    counter: u64,
    write_buf: Vec<u8>,
    read_buf: Vec<u8>,
}

impl FileRoundTrip {
    /// Create the workload for worker `index`, writing under `dir`.
    ///
    /// Files are named `writer_<index>_<n>`, so replicas sharing a directory never
    /// collide.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, index: usize) -> Self {
        Self {
            dir: dir.into(),
            prefix: format!("writer_{index}"),
            counter: 0,
            write_buf: Vec::new(),
            read_buf: Vec::new(),
        }
    }

    /// Directory the files are written to.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Files written so far.
    #[must_use]
    pub fn files_written(&self) -> u64 {
        self.counter
    }

    fn next_path(&mut self) -> PathBuf {
        let path = self.dir.join(format!("{}_{}", self.prefix, self.counter));
        self.counter += 1;
        path
    }
}

impl Workload for FileRoundTrip {
    type Input = usize;
    type Output = usize;

    #[allow(clippy::cast_possible_truncation)]
    fn process(&mut self, size: usize) -> anyhow::Result<usize> {
        let path = self.next_path();

        self.write_buf.clear();
        self.write_buf.resize(size, (size % 256) as u8);
        let mut file = File::create(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        file.write_all(&self.write_buf)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        drop(file);

        self.read_buf.clear();
        File::open(&path)
            .and_then(|mut f| f.read_to_end(&mut self.read_buf))
            .with_context(|| format!("Failed to read {}", path.display()))?;
        fs::remove_file(&path).with_context(|| format!("Failed to remove {}", path.display()))?;

        let read = self.read_buf.len();
        if read != size || self.read_buf != self.write_buf {
            bail!("Read back {read} bytes from {} but wrote {size}", path.display());
        }
        Ok(read)
    }
}
