//! Record sources
//!
//! A source yields typed records one at a time. The sequence is lazy, finite
//! and not restartable; the first failure ends it.
//!
//! # Overview
//!
//! - [`IterSource`] adapts any iterator of `Result<R>`
//! - [`StreamSource`] adapts any `futures::Stream` of `Result<R>`
//! - [`JsonLinesSource`] replays newline-delimited JSON documents
//! - [`ArmPager`] pages through an ARM list operation

mod arm;
mod jsonl;

pub use arm::ArmPager;
pub use jsonl::JsonLinesSource;

use crate::error::Result;
use crate::record::Record;
use async_trait::async_trait;
use futures::stream::{Stream, StreamExt};
use std::pin::Pin;

/// A pull-based sequence of records
#[async_trait]
pub trait RecordSource: Send {
    /// Record type produced by this source
    type Record: Record + Send;

    /// Fetch the next record, `None` once exhausted
    async fn next_record(&mut self) -> Result<Option<Self::Record>>;
}

/// Source over an iterator
#[derive(Debug)]
pub struct IterSource<I> {
    iter: I,
}

impl<I> IterSource<I> {
    pub fn new(iter: I) -> Self {
        Self { iter }
    }
}

#[async_trait]
impl<R, I> RecordSource for IterSource<I>
where
    R: Record + Send,
    I: Iterator<Item = Result<R>> + Send,
{
    type Record = R;

    async fn next_record(&mut self) -> Result<Option<R>> {
        self.iter.next().transpose()
    }
}

/// Source over an async stream
pub struct StreamSource<R> {
    stream: Pin<Box<dyn Stream<Item = Result<R>> + Send>>,
}

impl<R> StreamSource<R> {
    pub fn new(stream: impl Stream<Item = Result<R>> + Send + 'static) -> Self {
        Self {
            stream: Box::pin(stream),
        }
    }
}

#[async_trait]
impl<R: Record + Send> RecordSource for StreamSource<R> {
    type Record = R;

    async fn next_record(&mut self) -> Result<Option<R>> {
        self.stream.next().await.transpose()
    }
}

#[cfg(test)]
mod tests;
