//! Bounded, line-normalizing diff reader.

use std::io::{BufRead, Read};

use tracing::{debug, instrument, warn};

use crate::error::ReviewError;

/// Read a diff until end-of-stream, normalizing `\r\n` and bare `\r` to `\n`.
///
/// Fails with [`ReviewError::IngestionTooLarge`] as soon as the normalized text
/// would exceed `max_bytes`; nothing further is read.
#[instrument(skip_all, fields(max_bytes = max_bytes))]
pub fn read_diff<R: BufRead>(mut reader: R, max_bytes: usize) -> Result<String, ReviewError> {
    let mut diff = String::new();
    let mut raw = Vec::new();

    loop {
        raw.clear();
        // Within one read only a trailing CRLF shrinks under normalization, so a
        // line needing more than `remaining + 2` raw bytes cannot fit anyway.
        let allowance = (max_bytes - diff.len()) as u64 + 2;
        let n = (&mut reader)
            .take(allowance)
            .read_until(b'\n', &mut raw)
            .map_err(ReviewError::IngestionStream)?;
        if n == 0 {
            break;
        }

        for line in split_lines(&raw) {
            let line = String::from_utf8_lossy(line);
            if diff.len() + line.len() + 1 > max_bytes {
                warn!(limit = max_bytes, "diff exceeds input limit");
                return Err(ReviewError::IngestionTooLarge { limit: max_bytes });
            }
            diff.push_str(&line);
            diff.push('\n');
        }
    }

    debug!(bytes = diff.len(), "diff read");
    Ok(diff)
}

/// Split one `read_until` chunk into lines, treating bare `\r` as a terminator.
fn split_lines(chunk: &[u8]) -> impl Iterator<Item = &[u8]> {
    let chunk = chunk.strip_suffix(b"\n").unwrap_or(chunk);
    let chunk = chunk.strip_suffix(b"\r").unwrap_or(chunk);
    chunk.split(|&b| b == b'\r')
}
