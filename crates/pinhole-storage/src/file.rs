use crate::log::{invalid_format, InvalidLine, LogSink, LogWriter, Replay};
use dashmap::DashMap;
use pinhole_core::{ReadRepository, Record, Repository, Result, ShortCode, StoreError};
use pinhole_generator::{Generator, Seed, SeededGenerator};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use typed_builder::TypedBuilder;

/// What `store_url` does when the generated code is already taken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CollisionPolicy {
    /// Fail with `DuplicateCode` on the first collision.
    #[default]
    FailFast,
    /// Generate up to `attempts` more codes before failing with `DuplicateCode`.
    Retry { attempts: u32 },
}

impl CollisionPolicy {
    /// `Retry` with zero attempts behaves exactly like `FailFast`.
    pub fn retries(attempts: u32) -> Self {
        match attempts {
            0 => Self::FailFast,
            attempts => Self::Retry { attempts },
        }
    }

    fn attempts(self) -> u32 {
        match self {
            Self::FailFast => 0,
            Self::Retry { attempts } => attempts,
        }
    }
}

/// Configures a [`FileStore`] opened from a path.
#[derive(Debug, Clone, Copy, Default, TypedBuilder)]
pub struct StoreSettings {
    /// Seed of the code generator.
    #[builder(default)]
    pub seed: Seed,
    #[builder(default)]
    pub collision_policy: CollisionPolicy,
}

/// Outcome of replaying the log when a store is opened.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Recovery {
    /// Valid log lines applied, including superseded ones.
    pub lines_applied: usize,
    /// Distinct codes held after replay.
    pub records: usize,
    pub invalid_lines: Vec<InvalidLine>,
}

impl Recovery {
    pub fn is_clean(&self) -> bool {
        self.invalid_lines.is_empty()
    }

    /// Turns a report with corrupt lines into [`StoreError::InvalidFormat`].
    pub fn into_result(self) -> Result<()> {
        invalid_format(&self.invalid_lines)
    }
}

struct Writer<S, G> {
    log: LogWriter<S>,
    generator: G,
}

/// A code store backed by an append-only log.
///
/// Reads are served from a `DashMap` and never wait for writers. Every
/// mutation runs under one writer lock that covers the existence check,
/// the log append and the in-memory update, in that order: a record is
/// only visible once its log line is durable.
pub struct FileStore<S = File, G = SeededGenerator> {
    records: DashMap<ShortCode, Record>,
    writer: Mutex<Writer<S, G>>,
    policy: CollisionPolicy,
}

impl FileStore {
    /// Opens the log at `path`, creating it and its parent directory if
    /// missing, and replays it.
    pub fn open_path(path: impl AsRef<Path>, settings: StoreSettings) -> Result<(Self, Recovery)> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(path)?;
        let source = BufReader::new(file.try_clone()?);

        Self::open(
            source,
            file,
            SeededGenerator::new(settings.seed),
            settings.collision_policy,
        )
    }
}

impl<S: LogSink, G: Generator> FileStore<S, G> {
    /// Replays `source` into memory; later mutations are appended to `sink`.
    ///
    /// Corrupt lines don't fail the open, they are listed in the returned
    /// [`Recovery`]. Failing to read `source` does.
    pub fn open<R: BufRead>(
        source: R,
        sink: S,
        generator: G,
        policy: CollisionPolicy,
    ) -> Result<(Self, Recovery)> {
        let replay = Replay::read(source)?;

        let records = DashMap::with_capacity(replay.records.len());
        let lines_applied = replay.records.len();
        for record in replay.records {
            records.insert(record.code.clone(), record);
        }

        let recovery = Recovery {
            lines_applied,
            records: records.len(),
            invalid_lines: replay.invalid,
        };

        let log = if replay.torn_tail {
            LogWriter::after_torn_tail(sink)
        } else {
            LogWriter::new(sink)
        };

        let store = Self {
            records,
            writer: Mutex::new(Writer { log, generator }),
            policy,
        };
        Ok((store, recovery))
    }

    pub fn collision_policy(&self) -> CollisionPolicy {
        self.policy
    }

    /// Flushes and syncs the log handle.
    pub fn sync(&self) -> Result<()> {
        self.lock_writer()?.log.sync()
    }

    /// Number of log lines appended since the store was opened.
    pub fn appended(&self) -> Result<u64> {
        Ok(self.lock_writer()?.log.appended())
    }

    fn lock_writer(&self) -> Result<MutexGuard<'_, Writer<S, G>>> {
        self.writer.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Draws codes until one is free or the collision policy gives up.
    /// Must be called with the writer lock held.
    fn fresh_code(&self, generator: &G) -> Result<ShortCode> {
        let mut attempts_left = self.policy.attempts();
        loop {
            let code = generator.generate();
            if !self.records.contains_key(&code) {
                return Ok(code);
            }
            if attempts_left == 0 {
                return Err(StoreError::DuplicateCode(code.to_string()));
            }
            attempts_left -= 1;
        }
    }
}

impl<S: LogSink, G: Generator> ReadRepository for FileStore<S, G> {
    fn get_by_code(&self, code: &ShortCode) -> Result<Record> {
        self.records
            .get(code)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| StoreError::NotFound(code.to_string()))
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}

impl<S: LogSink, G: Generator> Repository for FileStore<S, G> {
    fn store_url(&self, url: &str) -> Result<Record> {
        let mut writer = self.lock_writer()?;
        let code = self.fresh_code(&writer.generator)?;

        let record = Record::new(code, url);
        writer.log.append(&record)?;
        self.records.insert(record.code.clone(), record.clone());

        Ok(record)
    }

    fn increment(&self, code: &ShortCode) -> Result<()> {
        let mut writer = self.lock_writer()?;
        let next = self
            .records
            .get(code)
            .map(|entry| entry.visited())
            .ok_or_else(|| StoreError::NotFound(code.to_string()))?;

        writer.log.append(&next)?;
        self.records.insert(next.code.clone(), next);

        Ok(())
    }
}
