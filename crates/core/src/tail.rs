// crates/core/src/tail.rs
//! Progress window over the copy tool's log.

use std::collections::VecDeque;
use std::path::Path;

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::error::JobError;

/// Number of log lines returned by a progress poll.
pub const PROGRESS_WINDOW: usize = 10;

/// Scan the whole log and keep the last `n` lines.
///
/// Reads from the beginning every call; no offset is remembered between
/// polls. Lines are split on `\n`, a trailing `\r` is dropped, and invalid
/// UTF-8 is replaced rather than rejected since tool output is not
/// guaranteed to be UTF-8. Returns lines oldest first.
pub async fn last_lines(path: &Path, n: usize) -> Result<Vec<String>, JobError> {
    let file = tokio::fs::File::open(path)
        .await
        .map_err(|e| JobError::progress_io(path, e))?;

    let mut reader = BufReader::new(file);
    let mut window: VecDeque<String> = VecDeque::with_capacity(n + 1);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .await
            .map_err(|e| JobError::progress_io(path, e))?;
        if read == 0 {
            break;
        }

        if buf.last() == Some(&b'\n') {
            buf.pop();
        }
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }

        window.push_back(String::from_utf8_lossy(&buf).into_owned());
        if window.len() > n {
            window.pop_front();
        }
    }

    Ok(window.into())
}

/// Render the progress response body: a `Progress:` header then the lines.
pub fn render_progress(lines: &[String]) -> String {
    format!("Progress:\n{}", lines.join("\n"))
}
