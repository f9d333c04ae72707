//! Test doubles shared by the proxy unit tests.

use super::upstream::{Upstream, UpstreamError};
use crate::recording::{
    HeaderMultiMap, Interaction, InteractionRepository, RecordedRequest, RecordedResponse,
    StorageError,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

/// Canned upstream that remembers what it was sent
pub struct FakeUpstream {
    reply: Result<RecordedResponse, String>,
    pub seen: Mutex<Vec<RecordedRequest>>,
}

impl FakeUpstream {
    pub fn ok(status: u16, body: &str) -> Arc<Self> {
        Self::replying(RecordedResponse::new(status, HeaderMultiMap::new(), body))
    }

    pub fn replying(response: RecordedResponse) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(response),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(message.to_string()),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().len()
    }
}

#[async_trait]
impl Upstream for FakeUpstream {
    async fn send(&self, request: &RecordedRequest) -> Result<RecordedResponse, UpstreamError> {
        self.seen.lock().push(request.clone());
        self.reply.clone().map_err(UpstreamError)
    }
}

/// Repository whose writes always fail
pub struct BrokenRepository;

impl InteractionRepository for BrokenRepository {
    fn store(&self, _: &Interaction) -> Result<(), StorageError> {
        Err(StorageError::Io(std::io::Error::other(
            "read-only file system",
        )))
    }
    fn find(&self, key: &str) -> Result<Interaction, StorageError> {
        Err(StorageError::NotFound(key.to_string()))
    }
    fn find_all(&self) -> Result<Vec<Interaction>, StorageError> {
        Ok(Vec::new())
    }
    fn count(&self) -> Result<usize, StorageError> {
        Ok(0)
    }
    fn clear(&self) -> Result<(), StorageError> {
        Ok(())
    }
}
