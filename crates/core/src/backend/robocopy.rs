// crates/core/src/backend/robocopy.rs
//! `robocopy /MIR` with per-file and per-directory listing suppressed.

use std::ffi::OsString;
use std::path::Path;

use super::{CopyBackend, CopyCommand, CopyRequest, OutputCapture};

/// Listing, header, summary, class and percentage output all off.
const QUIET_FLAGS: [&str; 6] = ["/NFL", "/NDL", "/NJH", "/NJS", "/NC", "/NP"];

#[derive(Debug, Clone, Copy, Default)]
pub struct WindowsMirror;

impl CopyBackend for WindowsMirror {
    fn command(&self, request: &CopyRequest, log_path: &Path) -> CopyCommand {
        let mut log_flag = OsString::from("/LOG:");
        log_flag.push(log_path.as_os_str());

        let mut args: Vec<OsString> = vec![
            OsString::from(&request.source),
            OsString::from(&request.destination),
            "/MIR".into(),
        ];
        args.extend(QUIET_FLAGS.iter().map(OsString::from));
        args.push(log_flag);

        CopyCommand {
            program: "robocopy".into(),
            args,
            capture: OutputCapture::ToolWritesLog,
        }
    }

    fn name(&self) -> &str {
        "robocopy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirror_with_own_log() {
        let req = CopyRequest::new(r"C:\data", r"D:\backup").unwrap();
        let cmd = WindowsMirror.command(&req, Path::new("progress.log"));

        assert_eq!(cmd.program, OsString::from("robocopy"));
        assert_eq!(
            cmd.args,
            vec![
                r"C:\data", r"D:\backup", "/MIR", "/NFL", "/NDL", "/NJH", "/NJS", "/NC", "/NP",
                "/LOG:progress.log",
            ]
        );
        assert_eq!(cmd.capture, OutputCapture::ToolWritesLog);
    }
}
