//! Shared helpers for the `Read` -> `Write` engine variants.

use std::io::{self, Read};

/// Fill `buf` as far as the reader allows.
///
/// Returns the number of bytes read; anything below `buf.len()` means the
/// reader hit end of stream.
pub(crate) fn read_full<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled = filled.saturating_add(n),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Widen a byte count for the `u64` totals the stream variants report.
pub(crate) fn as_u64(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}
