use chrono::{DateTime, Utc};
use ridebook_core::storage::keys;
use ridebook_core::KeyValueStore;
use ridebook_store::{JsonRecords, StoreError};
use std::sync::{Arc, Mutex};

use crate::models::{BookingDraft, BookingId};

/// Confirmed bookings, kept as a JSON list under the `bookings` key.
#[derive(Clone)]
pub struct BookingLedger {
    records: JsonRecords,
}

impl BookingLedger {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            records: JsonRecords::new(store),
        }
    }

    /// Returns the number of bookings after the append.
    pub async fn append(&self, booking: &BookingDraft) -> Result<usize, StoreError> {
        self.records.append(keys::BOOKINGS, booking).await
    }

    pub async fn list(&self) -> Result<Vec<BookingDraft>, StoreError> {
        self.records.load_list(keys::BOOKINGS).await
    }

    pub async fn find(&self, id: &BookingId) -> Result<Option<BookingDraft>, StoreError> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .find(|b| b.booking_id.as_ref() == Some(id)))
    }
}

/// Issues timestamp-derived booking ids, never the same one twice.
#[derive(Debug, Default)]
pub struct BookingIdGenerator {
    last_millis: Mutex<Option<i64>>,
}

impl BookingIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self, now: DateTime<Utc>) -> BookingId {
        let mut last = self.last_millis.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut millis = now.timestamp_millis();
        if let Some(previous) = *last {
            if millis <= previous {
                millis = previous + 1;
            }
        }
        *last = Some(millis);
        BookingId::from_timestamp_millis(millis)
    }
}
