//! Console logging for the binaries.
//!
//! Log lines go to stderr so they never interleave with menu or demo output
//! on stdout, and are optionally copied to a file.

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriter;

#[derive(Clone)]
pub struct LogWriter {
    file: Option<Arc<Mutex<File>>>,
}

impl LogWriter {
    /// # Errors
    /// Returns an error if the log file cannot be created.
    pub fn new(path: Option<PathBuf>) -> io::Result<Self> {
        let file = match path {
            Some(path) => Some(Arc::new(Mutex::new(File::create(path)?))),
            None => None,
        };
        Ok(Self { file })
    }
}

pub struct LogWriterGuard {
    file: Option<Arc<Mutex<File>>>,
}

impl<'a> MakeWriter<'a> for LogWriter {
    type Writer = LogWriterGuard;

    fn make_writer(&'a self) -> Self::Writer {
        LogWriterGuard {
            file: self.file.clone(),
        }
    }
}

fn lock(file: &Mutex<File>) -> MutexGuard<'_, File> {
    file.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

impl Write for LogWriterGuard {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        if let Some(file) = &self.file {
            lock(file).write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        if let Some(file) = &self.file {
            lock(file).flush()?;
        }
        Ok(())
    }
}

/// Install the global subscriber: INFO by default, DEBUG when `verbose`.
///
/// A second call is a no-op.
///
/// # Errors
/// Returns an error if the log file cannot be created.
pub fn init(log: Option<PathBuf>, verbose: bool) -> io::Result<()> {
    let writer = LogWriter::new(log)?;
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let _ = tracing_subscriber::fmt()
        .with_writer(writer)
        .with_target(false)
        .with_max_level(level)
        .try_init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tee_copies_lines_into_the_log_file() {
        let path = std::env::temp_dir().join(format!("cattask-log-{}.txt", std::process::id()));
        let writer = LogWriter::new(Some(path.clone())).unwrap();
        let mut guard = writer.make_writer();
        guard.write_all(b"[READ ERROR] boom\n").unwrap();
        guard.flush().unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "[READ ERROR] boom\n");
        let _ = std::fs::remove_file(path);
    }
}
