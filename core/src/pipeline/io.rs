//! File and memory access for the pipeline.
//!
//! Inputs are read chunk-by-chunk at known offsets. Outputs go to a temporary
//! file next to the destination and are renamed into place only when a run
//! succeeds, so a failed run never leaves a partial output behind.

use std::fs::File;
use std::io::{self, BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use bytes::Bytes;
use tempfile::NamedTempFile;

use crate::types::MtcError;
use crate::utils::read_up_to;

/// Random-access chunk reads over an input of known length.
pub trait ChunkSource {
    fn total_len(&mut self) -> io::Result<u64>;

    /// Reads up to `len` bytes starting at `offset`. Fewer bytes means the
    /// input ended early.
    fn read_range(&mut self, offset: u64, len: usize) -> io::Result<Bytes>;
}

#[derive(Debug)]
pub struct FileSource {
    file: File,
}

impl FileSource {
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        Ok(Self { file: File::open(path)? })
    }
}

impl ChunkSource for FileSource {
    fn total_len(&mut self) -> io::Result<u64> {
        Ok(self.file.metadata()?.len())
    }

    fn read_range(&mut self, offset: u64, len: usize) -> io::Result<Bytes> {
        self.file.seek(SeekFrom::Start(offset))?;
        let mut buf = vec![0u8; len];
        let n = read_up_to(&mut self.file, &mut buf)?;
        buf.truncate(n);
        Ok(Bytes::from(buf))
    }
}

/// In-memory input; chunk reads are zero-copy slices.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    data: Bytes,
}

impl MemorySource {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }
}

impl ChunkSource for MemorySource {
    fn total_len(&mut self) -> io::Result<u64> {
        Ok(self.data.len() as u64)
    }

    fn read_range(&mut self, offset: u64, len: usize) -> io::Result<Bytes> {
        let start = usize::try_from(offset).unwrap_or(usize::MAX).min(self.data.len());
        let end = start.saturating_add(len).min(self.data.len());
        Ok(self.data.slice(start..end))
    }
}

/// Sequential writer that only materializes at `dest` on [`commit`].
///
/// Dropping the sink without committing removes the temporary file.
///
/// [`commit`]: AtomicFileSink::commit
#[derive(Debug)]
pub struct AtomicFileSink {
    writer: BufWriter<NamedTempFile>,
    dest: PathBuf,
}

impl AtomicFileSink {
    pub fn create(dest: impl AsRef<Path>) -> Result<Self, MtcError> {
        let dest = dest.as_ref().to_path_buf();
        let dir = match dest.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let tmp = tempfile::Builder::new()
            .prefix(".mtc-")
            .suffix(".partial")
            .tempfile_in(&dir)?;
        Ok(Self { writer: BufWriter::new(tmp), dest })
    }

    /// Flushes, syncs and renames the temporary file over `dest`.
    pub fn commit(self) -> Result<(), MtcError> {
        let tmp = self.writer.into_inner().map_err(|e| e.into_error())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.dest).map_err(|e| e.error)?;
        Ok(())
    }
}

impl Write for AtomicFileSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.writer.write_all(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_source_clamps_ranges() {
        let mut src = MemorySource::new(b"abcdef".to_vec());
        assert_eq!(src.total_len().unwrap(), 6);
        assert_eq!(&src.read_range(2, 3).unwrap()[..], b"cde");
        assert_eq!(&src.read_range(4, 10).unwrap()[..], b"ef");
        assert!(src.read_range(9, 4).unwrap().is_empty());
    }

    #[test]
    fn uncommitted_sink_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.mtc");
        {
            let mut sink = AtomicFileSink::create(&dest).unwrap();
            sink.write_all(b"partial").unwrap();
        }
        assert!(!dest.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn committed_sink_replaces_destination() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.mtc");
        std::fs::write(&dest, b"old contents").unwrap();

        let mut sink = AtomicFileSink::create(&dest).unwrap();
        sink.write_all(b"new").unwrap();
        sink.commit().unwrap();

        assert_eq!(std::fs::read(&dest).unwrap(), b"new");
    }
}
