// crates/server/src/config.rs
//! Command-line and environment configuration.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use copy_drive_core::StatePaths;

/// HTTP control surface for a background rsync/robocopy job.
#[derive(Debug, Clone, Parser)]
#[command(name = "copy-drive", version, about)]
pub struct Config {
    /// Address to bind.
    #[arg(long, env = "COPY_DRIVE_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to listen on.
    #[arg(long, env = "COPY_DRIVE_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Directory holding the PID file and progress log. Defaults to the OS temp dir.
    #[arg(long, env = "COPY_DRIVE_STATE_DIR")]
    pub state_dir: Option<PathBuf>,

    /// PID file location. Defaults to `copy_pid` inside the state directory.
    #[arg(long, env = "COPY_DRIVE_PID_FILE")]
    pub pid_file: Option<PathBuf>,

    /// How long a stop waits for the copy tool to exit.
    #[arg(long, env = "COPY_DRIVE_STOP_TIMEOUT_SECS", default_value_t = 10)]
    pub stop_timeout_secs: u64,
}

impl Config {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn state_paths(&self) -> StatePaths {
        let paths = match &self.state_dir {
            Some(dir) => StatePaths::new(dir),
            None => StatePaths::in_temp_dir(),
        };
        match &self.pid_file {
            Some(path) => paths.with_pid_file(path),
            None => paths,
        }
    }

    pub fn stop_timeout(&self) -> Duration {
        Duration::from_secs(self.stop_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["copy-drive"]).unwrap();
        assert_eq!(config.addr(), "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(config.stop_timeout(), Duration::from_secs(10));
        assert_eq!(config.state_paths(), StatePaths::in_temp_dir());
    }

    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from([
            "copy-drive",
            "--host",
            "127.0.0.1",
            "--port",
            "9000",
            "--state-dir",
            "/var/lib/copy-drive",
            "--stop-timeout-secs",
            "3",
        ])
        .unwrap();

        assert_eq!(config.addr(), "127.0.0.1:9000".parse::<SocketAddr>().unwrap());
        assert_eq!(
            config.state_paths().pid_file(),
            PathBuf::from("/var/lib/copy-drive/copy_pid")
        );
        assert_eq!(config.stop_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn pid_file_moves_out_of_state_dir() {
        let config = Config::try_parse_from([
            "copy-drive",
            "--state-dir",
            "/var/lib/copy-drive",
            "--pid-file",
            "/run/copy-drive.pid",
        ])
        .unwrap();

        let paths = config.state_paths();
        assert_eq!(paths.pid_file(), PathBuf::from("/run/copy-drive.pid"));
        assert_eq!(paths.log_file(), PathBuf::from("/var/lib/copy-drive/progress.log"));
    }
}
