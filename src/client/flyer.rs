//! Resilient client for the verification service.
//!
//! # Responsibilities
//! - Run the same preflight before every operation (key, user id, breaker)
//! - Serve cached "allowed" verdicts without a request
//! - Trip the breaker on connectivity failures and fail open
//! - Decode envelopes, log advisories, surface explicit rejections

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::api::{
    Envelope, Outcome, Payload, ResultPayload, ServiceError, ServiceResult, SkipPayload, Task,
    TaskStatus,
};
use crate::config::{validate_config, ClientConfig, ConfigError};
use crate::observability::metrics;
use crate::resilience::{CircuitBreaker, CircuitState, Clock, SystemClock, VerdictCache};
use crate::transport::{HttpTransport, Method, Transport};

/// Client wrapping a [`Transport`] with caching, a circuit breaker and fail-open defaults.
///
/// All state (cache, breaker) is owned by the instance; two clients never share it.
/// Every operation returns either its value, its fail-open default, or a
/// [`ServiceError`] when the service explicitly rejected the request.
pub struct FlyerClient<T = HttpTransport, C = SystemClock> {
    config: ClientConfig,
    transport: T,
    clock: C,
    cache: VerdictCache,
    breaker: CircuitBreaker,
}

impl FlyerClient {
    /// Validate `config` and build a client talking to the real service.
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        validate_config(&config).map_err(ConfigError::Validation)?;
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_parts(config, transport, SystemClock))
    }
}

impl<T: Transport, C: Clock> FlyerClient<T, C> {
    /// Build a client from explicit parts. `config` is used as-is, without validation.
    pub fn with_parts(config: ClientConfig, transport: T, clock: C) -> Self {
        if !config.has_key() {
            tracing::warn!("No API key configured; every check will pass");
        }

        let cache = VerdictCache::new(config.cache_ttl(), config.cache_capacity);
        let breaker = CircuitBreaker::new(config.breaker_cooldown(), clock.now());

        tracing::debug!(
            base_url = %config.base_url,
            cache_ttl_secs = config.cache_ttl_secs,
            breaker_cooldown_secs = config.breaker_cooldown_secs,
            "Flyer client initialized"
        );

        Self {
            config,
            transport,
            clock,
            cache,
            breaker,
        }
    }

    /// Whether `user_id` may use the bot.
    ///
    /// `false` means the user still has tasks to complete. Outages, malformed
    /// responses and invalid ids all yield `true`.
    pub async fn check_subscription(
        &self,
        user_id: i64,
        language_code: Option<&str>,
        message: Option<&Value>,
    ) -> ServiceResult<bool> {
        let method = Method::Check;
        if !self.preflight(method, Some(user_id)) {
            return Ok(true);
        }

        if self.cache.is_allowed(user_id, self.clock.now()) {
            metrics::record_cache_hit();
            tracing::debug!(user_id, "Serving cached verdict");
            return Ok(true);
        }

        let mut params = user_params(user_id, language_code);
        if let Some(message) = message.filter(|m| !m.is_null()) {
            params.insert("message".to_string(), message.clone());
        }

        let Some(envelope) = self.dispatch::<SkipPayload>(method, Some(user_id), params).await else {
            return Ok(true);
        };

        let cacheable = !envelope.advisories.has_error();
        match envelope.into_outcome() {
            Outcome::Rejected(message) => Err(ServiceError::new(method, message)),
            Outcome::Payload(true) => {
                if cacheable {
                    self.cache.allow(user_id, self.clock.now());
                }
                Ok(true)
            }
            // A success envelope without `skip` is not an approval.
            Outcome::Payload(false) | Outcome::Empty => Ok(false),
        }
    }

    /// Tasks the user is asked to complete, unfiltered.
    ///
    /// Empty when the service is unreachable or the call is short-circuited.
    pub async fn list_tasks(
        &self,
        user_id: i64,
        language_code: Option<&str>,
        limit: Option<u32>,
    ) -> ServiceResult<Vec<Task>> {
        let method = Method::GetTasks;
        if !self.preflight(method, Some(user_id)) {
            return Ok(Vec::new());
        }

        let mut params = user_params(user_id, language_code);
        if let Some(limit) = limit {
            params.insert("limit".to_string(), Value::from(limit));
        }

        let envelope = self
            .dispatch::<ResultPayload<Vec<Task>>>(method, Some(user_id), params)
            .await;
        Ok(resolve(method, envelope)?.unwrap_or_default())
    }

    /// Re-verify one task by the signature obtained from [`list_tasks`](Self::list_tasks).
    ///
    /// `None` means the status is unknown and should be treated as still pending.
    pub async fn recheck_task(
        &self,
        user_id: i64,
        signature: &str,
    ) -> ServiceResult<Option<TaskStatus>> {
        let method = Method::CheckTask;
        if !self.preflight(method, Some(user_id)) {
            return Ok(None);
        }
        if signature.trim().is_empty() {
            tracing::error!(user_id, "Task signature is required");
            metrics::record_short_circuit(method, "invalid_argument");
            return Ok(None);
        }

        let mut params = user_params(user_id, None);
        params.insert("signature".to_string(), Value::from(signature));

        let envelope = self
            .dispatch::<ResultPayload<TaskStatus>>(method, Some(user_id), params)
            .await;
        resolve(method, envelope)
    }

    /// Tasks the user has already completed, as reported by the service.
    pub async fn completed_tasks(&self, user_id: i64) -> ServiceResult<Map<String, Value>> {
        let method = Method::GetCompletedTasks;
        if !self.preflight(method, Some(user_id)) {
            return Ok(Map::new());
        }

        let params = user_params(user_id, None);
        let envelope = self
            .dispatch::<ResultPayload<Map<String, Value>>>(method, Some(user_id), params)
            .await;
        Ok(resolve(method, envelope)?.unwrap_or_default())
    }

    /// Bot account information, or `None` when unavailable.
    pub async fn bot_info(&self) -> ServiceResult<Option<Map<String, Value>>> {
        let method = Method::GetMe;
        if !self.preflight(method, None) {
            return Ok(None);
        }

        let envelope = self
            .dispatch::<ResultPayload<Map<String, Value>>>(method, None, Map::new())
            .await;
        resolve(method, envelope)
    }

    pub fn breaker_state(&self) -> CircuitState {
        self.breaker.state(self.clock.now())
    }

    /// Number of cached "allowed" verdicts (expired entries are evicted lazily).
    pub fn cached_verdicts(&self) -> usize {
        self.cache.len()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Checks shared by every operation, in order. Returns false to short-circuit.
    fn preflight(&self, method: Method, user_id: Option<i64>) -> bool {
        if !self.config.has_key() {
            metrics::record_short_circuit(method, "no_key");
            return false;
        }

        // Only private chats (positive ids) can complete tasks.
        if let Some(user_id) = user_id.filter(|id| *id <= 0) {
            tracing::error!(method = %method, user_id, "The id is not a private chat");
            metrics::record_short_circuit(method, "invalid_user");
            return false;
        }

        if let Some(remaining) = self.breaker.remaining(self.clock.now()) {
            tracing::debug!(
                method = %method,
                remaining_secs = remaining.as_secs(),
                "Circuit open, skipping request"
            );
            metrics::record_short_circuit(method, "breaker_open");
            return false;
        }

        true
    }

    /// One round-trip plus decoding. `None` means "fail open".
    async fn dispatch<P>(
        &self,
        method: Method,
        user_id: Option<i64>,
        params: Map<String, Value>,
    ) -> Option<Envelope<P>>
    where
        P: Payload + DeserializeOwned + Default,
    {
        let body = match self.transport.call(method, params).await {
            Ok(body) => body,
            Err(e) if e.is_connectivity() => {
                self.breaker.trip(self.clock.now());
                metrics::record_request(method, e.kind());
                metrics::record_breaker_trip(method);
                tracing::warn!(
                    method = %method,
                    error = %e,
                    cooldown_secs = self.breaker.cooldown().as_secs(),
                    "Service unreachable, circuit opened"
                );
                return None;
            }
            Err(e) => {
                metrics::record_request(method, e.kind());
                tracing::error!(method = %method, error = %e, "Request failed");
                return None;
            }
        };

        match Envelope::<P>::decode(body) {
            Ok(envelope) => {
                metrics::record_request(method, "ok");
                envelope.advisories.log(method, user_id);
                Some(envelope)
            }
            Err(e) => {
                metrics::record_request(method, "invalid");
                tracing::error!(method = %method, error = %e, "Invalid response");
                None
            }
        }
    }
}

impl<T, C> std::fmt::Debug for FlyerClient<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlyerClient")
            .field("config", &self.config)
            .field("cached_verdicts", &self.cache.len())
            .finish()
    }
}

/// Params every user-scoped method shares.
fn user_params(user_id: i64, language_code: Option<&str>) -> Map<String, Value> {
    let mut params = Map::new();
    params.insert("user_id".to_string(), Value::from(user_id));
    if let Some(code) = language_code.filter(|c| !c.is_empty()) {
        params.insert("language_code".to_string(), Value::from(code));
    }
    params
}

/// Turn a decoded envelope (or a failed call) into the operation's result.
/// `Ok(None)` leaves the fail-open default to the caller.
fn resolve<P: Payload>(
    method: Method,
    envelope: Option<Envelope<P>>,
) -> ServiceResult<Option<P::Output>> {
    match envelope.map(Envelope::into_outcome) {
        Some(Outcome::Payload(value)) => Ok(Some(value)),
        Some(Outcome::Rejected(message)) => Err(ServiceError::new(method, message)),
        Some(Outcome::Empty) | None => Ok(None),
    }
}
