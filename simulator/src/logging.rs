use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use tracing_subscriber::fmt::writer::MakeWriter;

#[derive(Clone)]
pub(crate) struct LogWriter {
    file: Option<Arc<Mutex<File>>>,
}

impl LogWriter {
    pub(crate) fn new(path: Option<PathBuf>) -> io::Result<Self> {
        let file = match path {
            Some(path) => Some(Arc::new(Mutex::new(File::create(path)?))),
            None => None,
        };
        Ok(Self { file })
    }
}

pub(crate) struct LogWriterGuard {
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

impl Write for LogWriterGuard {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut stdout = io::stdout();
        stdout.write_all(buf)?;
        if let Some(file) = &self.file {
            let mut handle = file.lock().unwrap_or_else(PoisonError::into_inner);
            handle.write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()?;
        if let Some(file) = &self.file {
            let mut handle = file.lock().unwrap_or_else(PoisonError::into_inner);
            handle.flush()?;
        }
        Ok(())
    }
}

/// Keeps the first and the most recent step descriptions for failure reports.
pub(crate) struct EventLog {
    first: Vec<String>,
    tail: VecDeque<String>,
    first_cap: usize,
    tail_cap: usize,
    dropped: u64,
}

impl EventLog {
    pub(crate) fn new(first_cap: usize, tail_cap: usize) -> Self {
        Self {
            first: Vec::with_capacity(first_cap),
            tail: VecDeque::with_capacity(tail_cap),
            first_cap,
            tail_cap,
            dropped: 0,
        }
    }

    pub(crate) fn record(&mut self, message: String) {
        if self.first.len() < self.first_cap {
            self.first.push(message);
            return;
        }
        if self.tail_cap == 0 {
            self.dropped += 1;
            return;
        }
        if self.tail.len() == self.tail_cap {
            self.tail.pop_front();
            self.dropped += 1;
        }
        self.tail.push_back(message);
    }

    pub(crate) fn dump_failure(&self, reason: &str) {
        tracing::error!("invariant violated: {reason}");
        for line in &self.first {
            tracing::error!("  {line}");
        }
        if self.dropped > 0 {
            tracing::error!("  ... {} steps omitted ...", self.dropped);
        }
        for line in &self.tail {
            tracing::error!("  {line}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_log_keeps_head_and_tail() {
        let mut log = EventLog::new(2, 2);
        for i in 0..6 {
            log.record(format!("step {i}"));
        }
        assert_eq!(log.first, ["step 0", "step 1"]);
        assert_eq!(log.tail, ["step 4", "step 5"]);
        assert_eq!(log.dropped, 2);
    }
}
