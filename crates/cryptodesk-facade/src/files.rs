//! All-or-nothing file transforms.
//!
//! Output goes to a uniquely named temporary file next to the destination
//! and is renamed over it only after the engine finished and the data was
//! synced. On any failure the temporary file is removed and an existing
//! destination keeps its old contents.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use cryptodesk_crypto_core::{CryptoError, GostIv};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::algorithm::Algorithm;
use crate::error::EngineError;

/// Outcome of a completed file transform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    /// Bytes consumed from the source file.
    pub bytes_read: u64,
    /// Bytes in the destination file.
    pub bytes_written: u64,
    /// GOST only: the IV carried at the start of the encrypted file.
    pub iv_hex: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Encrypt,
    Decrypt,
}

impl Direction {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Encrypt => "encrypt",
            Self::Decrypt => "decrypt",
        }
    }
}

/// Run `engine` from `src` into `dst`.
///
/// The engine returns the GOST IV when one is involved, `None` otherwise.
pub(crate) fn transform_file<F>(
    src: &Path,
    dst: &Path,
    buffer_size: usize,
    algorithm: Algorithm,
    direction: Direction,
    engine: F,
) -> Result<FileReport, EngineError>
where
    F: FnOnce(&mut dyn Read, &mut dyn Write) -> Result<Option<GostIv>, CryptoError>,
{
    let input = File::open(src).map_err(|e| EngineError::io(src, e))?;
    let dir = destination_dir(dst);
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| EngineError::io(dir, e))?;

    let outcome = write_through(input, &mut tmp, buffer_size, engine).and_then(|counts| {
        tmp.persist(dst)
            .map(|_| counts)
            .map_err(|e| EngineError::io(dst, e.error))
    });

    match outcome {
        Ok((bytes_read, bytes_written, iv)) => {
            tracing::info!(
                algorithm = %algorithm,
                direction = direction.as_str(),
                bytes_read,
                bytes_written,
                "File transform complete"
            );
            Ok(FileReport {
                bytes_read,
                bytes_written,
                iv_hex: iv.map(|iv| iv.to_hex()),
            })
        }
        Err(e) => {
            tracing::warn!(
                algorithm = %algorithm,
                direction = direction.as_str(),
                "File transform failed, temporary output discarded: {e}"
            );
            Err(e)
        }
    }
}

/// Stream through buffered, counting wrappers and sync the temp file.
fn write_through<F>(
    input: File,
    tmp: &mut NamedTempFile,
    buffer_size: usize,
    engine: F,
) -> Result<(u64, u64, Option<GostIv>), EngineError>
where
    F: FnOnce(&mut dyn Read, &mut dyn Write) -> Result<Option<GostIv>, CryptoError>,
{
    let tmp_path = tmp.path().to_path_buf();
    let mut reader = Counting::new(BufReader::with_capacity(buffer_size, input));
    let mut writer = Counting::new(BufWriter::with_capacity(buffer_size, tmp.as_file_mut()));

    let iv = engine(&mut reader, &mut writer)?;

    let (bytes_read, bytes_written) = (reader.count, writer.count);
    let file = writer
        .inner
        .into_inner()
        .map_err(|e| EngineError::io(&tmp_path, e.into_error()))?;
    file.sync_all().map_err(|e| EngineError::io(&tmp_path, e))?;
    Ok((bytes_read, bytes_written, iv))
}

fn destination_dir(dst: &Path) -> &Path {
    dst.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

/// Byte-counting pass-through for either direction.
struct Counting<T> {
    inner: T,
    count: u64,
}

impl<T> Counting<T> {
    const fn new(inner: T) -> Self {
        Self { inner, count: 0 }
    }

    fn add(&mut self, n: usize) {
        self.count = self
            .count
            .saturating_add(u64::try_from(n).unwrap_or(u64::MAX));
    }
}

impl<R: Read> Read for Counting<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.add(n);
        Ok(n)
    }
}

impl<W: Write> Write for Counting<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.add(n);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
