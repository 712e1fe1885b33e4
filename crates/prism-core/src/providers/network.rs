//! Outbound call gate for completion clients.
//!
//! `PRISM_NETWORK_POLICY=deny` blocks every provider call for the process;
//! tests narrow the gate with a [`NetworkPolicyGuard`].

use crate::errors::RunError;
use std::sync::{Mutex, PoisonError};

pub const NETWORK_POLICY_ENV: &str = "PRISM_NETWORK_POLICY";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NetworkPolicy {
    Allow,
    Deny(String),
}

impl NetworkPolicy {
    /// The policy forced by the environment, if any. Only `deny` forces one.
    pub fn from_env() -> Option<Self> {
        let raw = std::env::var(NETWORK_POLICY_ENV).ok()?;
        raw.trim()
            .eq_ignore_ascii_case("deny")
            .then(|| NetworkPolicy::Deny(format!("{}=deny", NETWORK_POLICY_ENV)))
    }

    pub fn current() -> Self {
        Self::from_env()
            .unwrap_or_else(|| POLICY.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }
}

static POLICY: Mutex<NetworkPolicy> = Mutex::new(NetworkPolicy::Allow);

/// Replaces the in-process policy until dropped.
pub struct NetworkPolicyGuard {
    previous: NetworkPolicy,
}

impl NetworkPolicyGuard {
    pub fn set(policy: NetworkPolicy) -> Self {
        let mut current = POLICY.lock().unwrap_or_else(PoisonError::into_inner);
        let previous = std::mem::replace(&mut *current, policy);
        Self { previous }
    }

    pub fn deny(reason: impl Into<String>) -> Self {
        Self::set(NetworkPolicy::Deny(reason.into()))
    }
}

impl Drop for NetworkPolicyGuard {
    fn drop(&mut self) {
        let mut current = POLICY.lock().unwrap_or_else(PoisonError::into_inner);
        *current = self.previous.clone();
    }
}

/// Fails with a `Network` error naming the host when calls to `url` are blocked.
pub fn check_outbound(provider: &str, url: &str) -> Result<(), RunError> {
    match NetworkPolicy::current() {
        NetworkPolicy::Allow => Ok(()),
        NetworkPolicy::Deny(reason) => {
            let host = reqwest::Url::parse(url)
                .ok()
                .and_then(|u| u.host_str().map(str::to_owned))
                .unwrap_or_else(|| url.to_string());
            tracing::debug!(provider, host = %host, "outbound call blocked");
            Err(RunError::network(
                provider,
                format!("outbound network blocked by policy (host={}): {}", host, reason),
            ))
        }
    }
}
