//! Scripted transport for testing.

use serde_json::{Map, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::transport::{Method, Transport, TransportError, TransportResult};

/// One call seen by a [`ScriptedTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: Method,
    pub params: Map<String, Value>,
}

#[derive(Debug, Default)]
struct Script {
    queue: VecDeque<TransportResult<Value>>,
    fallback: Option<TransportResult<Value>>,
    calls: Vec<RecordedCall>,
}

/// Transport that replays scripted results and records every call.
///
/// Queued results are consumed first, then the fallback set with [`always`](Self::always)
/// is repeated. With neither, calls fail with [`TransportError::Request`].
/// Clones share the script and the call log.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTransport {
    script: Arc<Mutex<Script>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue a decoded body for the next call.
    pub fn respond(&self, body: Value) -> &Self {
        self.script().queue.push_back(Ok(body));
        self
    }

    /// Queue a failure for the next call.
    pub fn fail(&self, error: TransportError) -> &Self {
        self.script().queue.push_back(Err(error));
        self
    }

    /// Result returned once the queue is drained.
    pub fn always(&self, result: TransportResult<Value>) -> &Self {
        self.script().fallback = Some(result);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.script().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.script().calls.len()
    }

    fn next(&self, method: Method, params: Map<String, Value>) -> TransportResult<Value> {
        let mut script = self.script();
        script.calls.push(RecordedCall { method, params });

        match script.queue.pop_front() {
            Some(result) => result,
            None => script.fallback.clone().unwrap_or_else(|| {
                Err(TransportError::Request(format!(
                    "no scripted response for {}",
                    method
                )))
            }),
        }
    }
}

impl Transport for ScriptedTransport {
    async fn call(&self, method: Method, params: Map<String, Value>) -> TransportResult<Value> {
        self.next(method, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_queue_then_fallback() {
        let transport = ScriptedTransport::new();
        transport
            .respond(json!({"skip": true}))
            .always(Err(TransportError::Connectivity("refused".into())));

        let first = transport.call(Method::Check, Map::new()).await;
        assert_eq!(first, Ok(json!({"skip": true})));

        let second = transport.call(Method::GetTasks, Map::new()).await;
        assert!(second.unwrap_err().is_connectivity());

        let calls = transport.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].method, Method::GetTasks);
    }

    #[tokio::test]
    async fn test_unscripted_call_fails() {
        let transport = ScriptedTransport::new();
        let result = transport.call(Method::GetMe, Map::new()).await;
        assert!(matches!(result, Err(TransportError::Request(_))));
    }
}
