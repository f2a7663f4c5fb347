//! Scripted provider adapters
//!
//! An in-process [`ProviderAdapter`] whose answers are fixed up front, so
//! router behavior can be exercised end to end without network access.

use adaptive_router::core::providers::{Completion, CompletionRequest, ProviderAdapter, Usage};
use adaptive_router::ProviderError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// One scripted answer
#[derive(Debug, Clone)]
pub enum Script {
    Reply { text: String, tokens: u64 },
    Fail(ProviderError),
    /// Never answers; the router's call timeout fires first
    Hang,
    /// Answer after a delay
    Slow { delay: Duration, tokens: u64 },
}

impl Script {
    pub fn reply(text: &str, tokens: u64) -> Self {
        Script::Reply {
            text: text.to_string(),
            tokens,
        }
    }
}

/// Plays its script in order, then repeats the fallback answer
pub struct ScriptedAdapter {
    name: &'static str,
    script: Mutex<VecDeque<Script>>,
    fallback: Script,
    calls: AtomicUsize,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedAdapter {
    pub fn new(name: &'static str, fallback: Script) -> Self {
        Self {
            name,
            script: Mutex::new(VecDeque::new()),
            fallback,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always answers `text` with `tokens` tokens
    pub fn replying(name: &'static str, text: &str, tokens: u64) -> Arc<Self> {
        Arc::new(Self::new(name, Script::reply(text, tokens)))
    }

    /// Always fails with a network error
    pub fn failing(name: &'static str) -> Arc<Self> {
        Arc::new(Self::new(
            name,
            Script::Fail(ProviderError::network(name, "connection refused")),
        ))
    }

    pub fn hanging(name: &'static str) -> Arc<Self> {
        Arc::new(Self::new(name, Script::Hang))
    }

    /// Queue answers played before the fallback answer
    pub fn then(self, step: Script) -> Self {
        self.script.lock().push_back(step);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl ProviderAdapter for ScriptedAdapter {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn generate_completion(
        &self,
        request: CompletionRequest,
    ) -> Result<Completion, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request.clone());
        let step = self
            .script
            .lock()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());

        match step {
            Script::Reply { text, tokens } => Ok(Completion {
                text,
                usage: Usage {
                    total_tokens: tokens,
                },
                model: request.model,
            }),
            Script::Fail(err) => Err(err),
            Script::Hang => std::future::pending::<Result<Completion, ProviderError>>().await,
            Script::Slow { delay, tokens } => {
                tokio::time::sleep(delay).await;
                Ok(Completion {
                    text: format!("{} (slow)", self.name),
                    usage: Usage {
                        total_tokens: tokens,
                    },
                    model: request.model,
                })
            }
        }
    }
}
