use pinhole_core::{Record, Result, StoreError};
use std::fs::File;
use std::io::{self, BufRead, Write};

/// The backing handle records are appended to.
///
/// `sync` is called after every append and must not return before the
/// written bytes are durable. In-memory sinks have nothing to sync.
pub trait LogSink: Write + Send + 'static {
    fn sync(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl LogSink for File {
    fn sync(&mut self) -> io::Result<()> {
        self.sync_data()
    }
}

impl LogSink for Vec<u8> {}

impl LogSink for io::Cursor<Vec<u8>> {}

impl<S: LogSink + ?Sized> LogSink for Box<S> {
    fn sync(&mut self) -> io::Result<()> {
        (**self).sync()
    }
}

/// A log line that could not be parsed during replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidLine {
    /// 1-based line number in the log.
    pub number: usize,
    pub content: String,
    pub reason: String,
}

/// Everything read back from a log.
#[derive(Debug, Default)]
pub struct Replay {
    /// Parsed records, in file order.
    pub records: Vec<Record>,
    pub invalid: Vec<InvalidLine>,
    /// The last line had no terminating newline (a torn write).
    pub torn_tail: bool,
}

impl Replay {
    /// Reads every line of `source`.
    ///
    /// Blank lines are skipped. Lines that don't parse as a [`Record`] are
    /// collected in [`Replay::invalid`] and reading carries on. Only an
    /// I/O error on the source aborts the replay.
    pub fn read<R: BufRead>(mut source: R) -> Result<Self> {
        let mut replay = Replay::default();
        let mut buf = Vec::new();
        let mut number = 0;

        loop {
            buf.clear();
            if source.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            number += 1;

            let terminated = buf.last() == Some(&b'\n');
            let line = trim_line_end(&buf);
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            replay.torn_tail = !terminated;

            match serde_json::from_slice::<Record>(line) {
                Ok(record) => replay.records.push(record),
                Err(e) => replay.invalid.push(InvalidLine {
                    number,
                    content: String::from_utf8_lossy(line).into_owned(),
                    reason: e.to_string(),
                }),
            }
        }

        Ok(replay)
    }
}

pub(crate) fn invalid_format(invalid: &[InvalidLine]) -> Result<()> {
    if invalid.is_empty() {
        return Ok(());
    }
    Err(StoreError::InvalidFormat {
        count: invalid.len(),
        lines: invalid.iter().map(|line| line.content.clone()).collect(),
    })
}

fn trim_line_end(buf: &[u8]) -> &[u8] {
    let buf = buf.strip_suffix(b"\n").unwrap_or(buf);
    buf.strip_suffix(b"\r").unwrap_or(buf)
}

/// Appends records to a [`LogSink`], one JSON object per line.
pub struct LogWriter<S> {
    sink: S,
    /// The sink may end in a partial line; start the next record on a new one.
    needs_newline: bool,
    appended: u64,
}

impl<S: LogSink> LogWriter<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            needs_newline: false,
            appended: 0,
        }
    }

    /// Creates a writer for a sink whose last line was left unterminated.
    pub fn after_torn_tail(sink: S) -> Self {
        Self {
            needs_newline: true,
            ..Self::new(sink)
        }
    }

    /// Writes `record` as one line and syncs the sink.
    ///
    /// When this returns `Ok` the record is durable. On error nothing can
    /// be assumed about the sink, and the next append starts a fresh line
    /// so a half-written record can't swallow it.
    pub fn append(&mut self, record: &Record) -> Result<()> {
        let mut line = Vec::with_capacity(128);
        if self.needs_newline {
            line.push(b'\n');
        }
        serde_json::to_writer(&mut line, record)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        line.push(b'\n');

        self.needs_newline = true;
        self.sink.write_all(&line)?;
        self.sink.flush()?;
        self.sink.sync()?;
        self.needs_newline = false;
        self.appended += 1;

        Ok(())
    }

    /// Syncs the sink without writing anything.
    pub fn sync(&mut self) -> Result<()> {
        self.sink.flush()?;
        self.sink.sync()?;
        Ok(())
    }

    /// Number of records appended through this writer.
    pub fn appended(&self) -> u64 {
        self.appended
    }

    pub fn into_inner(self) -> S {
        self.sink
    }
}

#[cfg(test)]
pub(crate) mod test_sink {
    use super::LogSink;
    use std::io::{self, Write};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    /// An in-memory sink that can be inspected after it was moved into a
    /// store, and told to fail on demand.
    #[derive(Clone, Default)]
    pub(crate) struct TestSink {
        buf: Arc<Mutex<Vec<u8>>>,
        fail: Arc<AtomicBool>,
        partial: Arc<AtomicBool>,
    }

    impl TestSink {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        /// Every write fails until switched back.
        pub(crate) fn set_failing(&self, fail: bool) {
            self.fail.store(fail, Ordering::SeqCst);
        }

        /// Writes land half of their bytes, then fail.
        pub(crate) fn set_partial(&self, partial: bool) {
            self.partial.store(partial, Ordering::SeqCst);
        }

        pub(crate) fn contents(&self) -> String {
            let buf = self.buf.lock().expect("test sink lock should not be poisoned");
            String::from_utf8(buf.clone()).expect("log is utf-8")
        }

        /// Non-empty lines written so far.
        pub(crate) fn lines(&self) -> Vec<String> {
            self.contents()
                .lines()
                .filter(|line| !line.is_empty())
                .map(str::to_owned)
                .collect()
        }
    }

    impl Write for TestSink {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(io::Error::new(io::ErrorKind::Other, "sink unavailable"));
            }
            let mut buf = self.buf.lock().expect("test sink lock should not be poisoned");
            if self.partial.load(Ordering::SeqCst) {
                buf.extend_from_slice(&data[..data.len() / 2]);
                return Err(io::Error::new(io::ErrorKind::Other, "short write"));
            }
            buf.extend_from_slice(data);
            Ok(data.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl LogSink for TestSink {}
}
