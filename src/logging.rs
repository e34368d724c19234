//! Logger setup
//!
//! Logs go to stderr through env_logger (default level `info`, override with
//! `RUST_LOG`). With a log file configured every record is also appended there.

use crate::error::Result;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

/// Writes each record to stderr and to a log file
struct TeeWriter {
    file: File,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        self.file.flush()
    }
}

fn builder() -> env_logger::Builder {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
}

/// Initialize logging, mirroring to `log_file` when given
pub fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let mut builder = builder();

    if let Some(path) = log_file {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(TeeWriter { file })));
    }

    builder.init();
    if let Some(path) = log_file {
        log::debug!("Logging to {}", path.display());
    }
    Ok(())
}
