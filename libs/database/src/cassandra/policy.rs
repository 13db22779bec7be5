//! Fixed driver policies applied to every session.
//!
//! None of these are configurable from [`CassandraConfig`](super::CassandraConfig).

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use scylla::client::execution_profile::ExecutionProfile;
use scylla::policies::load_balancing::DefaultPolicy;
use scylla::policies::retry::{
    DefaultRetryPolicy, RequestInfo, RetryDecision, RetryPolicy, RetrySession,
};
use scylla::statement::Consistency;

pub const DEFAULT_PORT: u16 = 9042;
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const MAX_RETRIES: usize = 3;
pub const CONSISTENCY: Consistency = Consistency::LocalQuorum;

/// Append the default CQL port to a node address that has none.
///
/// Accepts bare hostnames, IPv4/IPv6 literals, `host:port` and `[v6]:port`.
pub fn with_default_port(node: &str) -> String {
    let node = node.trim();

    if node.parse::<SocketAddr>().is_ok() {
        return node.to_string();
    }
    if let Ok(ip) = node.parse::<IpAddr>() {
        return SocketAddr::new(ip, DEFAULT_PORT).to_string();
    }
    match node.rsplit_once(':') {
        Some((host, port)) if !host.is_empty() && port.parse::<u16>().is_ok() => node.to_string(),
        _ => format!("{node}:{DEFAULT_PORT}"),
    }
}

/// Token-aware round-robin, `LOCAL_QUORUM`, fixed timeout and capped retries
pub fn execution_profile() -> ExecutionProfile {
    let load_balancing = DefaultPolicy::builder()
        .token_aware(true)
        .permit_dc_failover(false)
        .build();

    ExecutionProfile::builder()
        .consistency(CONSISTENCY)
        .request_timeout(Some(REQUEST_TIMEOUT))
        .load_balancing_policy(load_balancing)
        .retry_policy(Arc::new(BoundedRetryPolicy::new(MAX_RETRIES)))
        .build()
}

/// Retry policy that lets the driver's default classification decide *whether*
/// a failed attempt is retryable, but stops after `max_retries` retries of a
/// single request.
///
/// Retries are issued immediately. The driver's retry sessions decide
/// synchronously and cannot delay an attempt, so there is no backoff between
/// retries, only the ceiling.
#[derive(Debug)]
pub struct BoundedRetryPolicy {
    max_retries: usize,
    inner: DefaultRetryPolicy,
}

impl BoundedRetryPolicy {
    pub fn new(max_retries: usize) -> Self {
        Self {
            max_retries,
            inner: DefaultRetryPolicy::new(),
        }
    }

    pub fn max_retries(&self) -> usize {
        self.max_retries
    }
}

impl RetryPolicy for BoundedRetryPolicy {
    fn new_session(&self) -> Box<dyn RetrySession> {
        Box::new(BoundedRetrySession::new(self.max_retries, self.inner.new_session()))
    }
}

struct BoundedRetrySession {
    max_retries: usize,
    retries: usize,
    inner: Box<dyn RetrySession>,
}

impl BoundedRetrySession {
    fn new(max_retries: usize, inner: Box<dyn RetrySession>) -> Self {
        Self {
            max_retries,
            retries: 0,
            inner,
        }
    }

    /// Count a retry decision against the ceiling, turning it into
    /// `DontRetry` once the ceiling has been reached.
    fn cap(&mut self, decision: RetryDecision) -> RetryDecision {
        match decision {
            RetryDecision::RetrySameTarget(_) | RetryDecision::RetryNextTarget(_) => {
                if self.retries >= self.max_retries {
                    return RetryDecision::DontRetry;
                }
                self.retries += 1;
                decision
            }
            other => other,
        }
    }
}

impl RetrySession for BoundedRetrySession {
    fn decide_should_retry(&mut self, request_info: RequestInfo) -> RetryDecision {
        let decision = self.inner.decide_should_retry(request_info);
        self.cap(decision)
    }

    fn reset(&mut self) {
        self.retries = 0;
        self.inner.reset();
    }
}
