//! Typed events decoded from the `go test -json` stream
//!
//! `go test -json` (via test2json) emits one JSON object per line describing
//! test lifecycle transitions and output fragments. This module turns a byte
//! stream of those records into a lazy sequence of [`Event`] values.

use crate::error::{Error, Result};
use serde::Deserialize;
use serde_json::de::IoRead;
use serde_json::{Deserializer, StreamDeserializer};
use std::io::{self, Read};

/// Lifecycle tag of a test2json record.
///
/// The producer's vocabulary may grow; anything outside the actions the
/// engine cares about decodes to [`Action::Other`] and is ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Run,
    Pass,
    Fail,
    Skip,
    Output,
    #[default]
    #[serde(other)]
    Other,
}

/// One decoded record from the event stream.
///
/// An empty `test` means the event applies to the whole package. The wire
/// format also carries `Time` and `Elapsed` fields; they are accepted and
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Event {
    pub action: Action,
    pub package: String,
    pub test: String,
    pub output: String,
}

/// Lazy sequence of events over a newline-delimited JSON byte stream.
///
/// Natural end-of-stream and a closed pipe both end the sequence cleanly.
/// Any other decode failure (including truncation in the middle of a record)
/// is yielded once as [`Error::Decode`], after which the iterator is fused.
pub struct EventStream<R: Read> {
    inner: StreamDeserializer<'static, IoRead<R>, Event>,
    done: bool,
}

impl<R: Read> EventStream<R> {
    pub fn new(input: R) -> Self {
        EventStream {
            inner: Deserializer::from_reader(input).into_iter(),
            done: false,
        }
    }
}

impl<R: Read> Iterator for EventStream<R> {
    type Item = Result<Event>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.inner.next() {
            None => {
                self.done = true;
                None
            }
            Some(Ok(event)) => Some(Ok(event)),
            Some(Err(err)) => {
                self.done = true;
                if stream_closed(&err) {
                    None
                } else {
                    Some(Err(Error::Decode(err)))
                }
            }
        }
    }
}

/// Reading from a pipe the other side tore down is a normal way for a pass
/// to end, not a decode failure.
fn stream_closed(err: &serde_json::Error) -> bool {
    matches!(
        err.io_error_kind(),
        Some(io::ErrorKind::BrokenPipe | io::ErrorKind::ConnectionReset)
    )
}
