use std::{collections::VecDeque, sync::Mutex};

use async_trait::async_trait;

use crate::{
    models::QueueEntry,
    providers::{FetchError, SnapshotFetcher},
};

/// A fetcher that replays a fixed script of responses, then keeps returning
/// the last one.
#[derive(Debug)]
pub struct ScriptedFetcher {
    script: Mutex<VecDeque<Result<Vec<QueueEntry>, FetchError>>>,
    last: Mutex<Option<Vec<QueueEntry>>>,
    calls: Mutex<usize>,
}

impl ScriptedFetcher {
    /// Creates a fetcher replaying `script` in order.
    pub fn new(script: Vec<Result<Vec<QueueEntry>, FetchError>>) -> Self {
        Self { script: Mutex::new(script.into()), last: Mutex::new(None), calls: Mutex::new(0) }
    }

    /// Number of `fetch` calls so far.
    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl SnapshotFetcher for ScriptedFetcher {
    async fn fetch(&self) -> Result<Vec<QueueEntry>, FetchError> {
        *self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) += 1;

        let next = self.script.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).pop_front();
        let mut last = self.last.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        match next {
            Some(Ok(entries)) => {
                *last = Some(entries.clone());
                Ok(entries)
            }
            Some(Err(e)) => Err(e),
            None => last.clone().ok_or_else(|| FetchError::Unreachable("script exhausted".into())),
        }
    }
}
