//! Scripted transport for tests.

use super::{ProviderError, Upstream, UpstreamReply};
use crate::services::providers::gemini::GenerateContentRequest;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Replays a fixed list of replies; the last one repeats once the script
/// runs out. Counts every call.
pub struct ScriptedUpstream {
    script: Mutex<VecDeque<UpstreamReply>>,
    last: UpstreamReply,
    calls: AtomicUsize,
}

impl ScriptedUpstream {
    pub fn new(replies: Vec<UpstreamReply>) -> Self {
        let last = replies
            .last()
            .cloned()
            .unwrap_or_else(|| UpstreamReply::new(reqwest::StatusCode::OK, "{}"));

        Self {
            script: Mutex::new(replies.into()),
            last,
            calls: AtomicUsize::new(0),
        }
    }

    /// Same reply on every call.
    pub fn always(reply: UpstreamReply) -> Self {
        Self::new(vec![reply])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Upstream for ScriptedUpstream {
    async fn send(&self, _request: &GenerateContentRequest) -> Result<UpstreamReply, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let next = match self.script.lock() {
            Ok(mut script) => script.pop_front(),
            Err(poisoned) => poisoned.into_inner().pop_front(),
        };

        Ok(next.unwrap_or_else(|| self.last.clone()))
    }

    fn model(&self) -> &str {
        "scripted"
    }
}
