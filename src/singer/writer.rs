//! Singer message writer
//!
//! Serializes messages as newline-delimited JSON to any `Write` (stdout in
//! the binary, a `Vec<u8>` in tests) and tracks bookmarks as records pass.

use super::{Message, State};
use crate::appfigures::StreamMetadata;
use crate::etl::Loader;

use chrono::Utc;
use eyre::{Result, eyre};
use serde_json::Value;
use std::io::Write;
use std::sync::{Mutex, MutexGuard};

pub struct SingerWriter<W> {
    out: Mutex<W>,
    state: Mutex<State>,
}

impl<W: Write + Send> SingerWriter<W> {
    /// Create a writer seeded with the state handed in by the caller
    pub fn new(out: W, state: State) -> Self {
        Self {
            out: Mutex::new(out),
            state: Mutex::new(state),
        }
    }

    fn out(&self) -> Result<MutexGuard<'_, W>> {
        self.out
            .lock()
            .map_err(|_| eyre!("Singer output lock poisoned"))
    }

    fn bookmarks(&self) -> Result<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| eyre!("Singer state lock poisoned"))
    }

    /// Write a single message line
    pub fn write_message(&self, message: &Message) -> Result<()> {
        let mut out = self.out()?;
        serde_json::to_writer(&mut *out, message)?;
        writeln!(out)?;
        out.flush()?;
        Ok(())
    }

    pub fn write_schema(&self, stream: &StreamMetadata) -> Result<()> {
        self.write_message(&Message::schema(stream))
    }

    /// Emit the current bookmarks as a STATE message
    pub fn write_state(&self) -> Result<()> {
        let message = Message::state(&*self.bookmarks()?)?;
        self.write_message(&message)
    }

    /// Write a batch of records for a stream, advancing its bookmark
    pub fn write_records(&self, stream: &StreamMetadata, records: Vec<Value>) -> Result<usize> {
        let time_extracted = Utc::now();
        let count = records.len();

        let mut state = self.bookmarks()?;
        let mut out = self.out()?;
        for record in records {
            if let Some(key) = stream.replication_key
                && let Some(value) = record.get(key)
            {
                state.advance(stream.name, key, value);
            }
            serde_json::to_writer(&mut *out, &Message::record(stream, record, time_extracted))?;
            writeln!(out)?;
        }
        out.flush()?;

        Ok(count)
    }

    /// Loader that writes RECORD messages for one stream
    pub fn stream_loader<'a>(&'a self, stream: &'a StreamMetadata) -> StreamLoader<'a, W> {
        StreamLoader {
            writer: self,
            stream,
        }
    }

    /// Snapshot of the bookmarks seen so far
    pub fn state(&self) -> Result<State> {
        Ok(self.bookmarks()?.clone())
    }

    pub fn into_inner(self) -> Result<W> {
        self.out
            .into_inner()
            .map_err(|_| eyre!("Singer output lock poisoned"))
    }
}

/// Loads records of one stream into a [`SingerWriter`]
pub struct StreamLoader<'a, W> {
    writer: &'a SingerWriter<W>,
    stream: &'a StreamMetadata,
}

impl<W: Write + Send> Loader for StreamLoader<'_, W> {
    type Item = Value;

    async fn load(&self, items: Vec<Self::Item>) -> Result<usize> {
        let count = self.writer.write_records(self.stream, items)?;
        log::debug!("Wrote {} {} record(s)", count, self.stream.name);
        Ok(count)
    }
}
