//! Paging through ARM list operations

use super::RecordSource;
use crate::error::{Error, Result};
use crate::http::{ArmClient, PageRequest};
use crate::record::Record;
use crate::types::JsonValue;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::collections::VecDeque;
use std::marker::PhantomData;
use tracing::debug;

/// Lazily fetches pages and yields their records
///
/// Each `value` element is deserialized into `T`. The next page is requested
/// only once the current one is drained, following `nextLink` until it is
/// missing or empty.
pub struct ArmPager<T> {
    client: ArmClient,
    next: Option<PageRequest>,
    buffer: VecDeque<JsonValue>,
    pages: usize,
    _record: PhantomData<fn() -> T>,
}

impl<T> ArmPager<T> {
    pub fn new(client: ArmClient, first: PageRequest) -> Self {
        Self {
            client,
            next: Some(first),
            buffer: VecDeque::new(),
            pages: 0,
            _record: PhantomData,
        }
    }

    /// Pages fetched so far
    pub fn pages(&self) -> usize {
        self.pages
    }
}

#[async_trait]
impl<T> RecordSource for ArmPager<T>
where
    T: Record + DeserializeOwned + Send,
{
    type Record = T;

    async fn next_record(&mut self) -> Result<Option<T>> {
        loop {
            if let Some(raw) = self.buffer.pop_front() {
                let record = serde_json::from_value(raw).map_err(|e| {
                    Error::decode(format!("page {}: {e}", self.pages))
                })?;
                return Ok(Some(record));
            }
            let Some(request) = self.next.take() else {
                return Ok(None);
            };
            let page = self.client.get_page(&request).await?;
            self.pages += 1;
            debug!(
                page = self.pages,
                records = page.value.len(),
                more = page.next().is_some(),
                "Fetched page"
            );
            self.next = page.next().map(|link| PageRequest::Link(link.to_string()));
            self.buffer.extend(page.value);
        }
    }
}
