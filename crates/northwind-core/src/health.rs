//! Result of probing a store's ping endpoint.
//!
//! A probe either gets a 2xx answer (`Healthy`), gets some other HTTP answer
//! (`Degraded`: the store is up but refuses or misroutes the probe), or gets
//! no answer at all (`Unhealthy`).

use std::time::Duration;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Reachability of the store, as seen by one probe.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    #[default]
    Healthy,
    Degraded,
    Unhealthy,
}

/// Outcome of a single ping probe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceHealth {
    pub status: ServiceStatus,
    /// Round trip of the probe; absent when no answer came back.
    pub latency: Option<Duration>,
    /// HTTP status of the answer, if any.
    pub http_status: Option<u16>,
    /// Why the probe did not succeed.
    pub detail: Option<String>,
    pub checked_at: Timestamp,
}

impl ServiceHealth {
    fn probed(status: ServiceStatus) -> Self {
        Self {
            status,
            latency: None,
            http_status: None,
            detail: None,
            checked_at: Timestamp::now(),
        }
    }

    /// The store answered the probe with `http_status` after `latency`.
    ///
    /// Any non-2xx answer is reported as degraded.
    pub fn answered(http_status: u16, latency: Duration) -> Self {
        let mut health = if (200..300).contains(&http_status) {
            Self::probed(ServiceStatus::Healthy)
        } else {
            let mut health = Self::probed(ServiceStatus::Degraded);
            health.detail = Some(format!("ping returned HTTP {http_status}"));
            health
        };
        health.latency = Some(latency);
        health.http_status = Some(http_status);
        health
    }

    /// The probe got no answer.
    pub fn unreachable(reason: impl Into<String>) -> Self {
        let mut health = Self::probed(ServiceStatus::Unhealthy);
        health.detail = Some(reason.into());
        health
    }

    /// Report for clients that have nothing to probe, such as in-memory ones.
    pub fn local() -> Self {
        Self::probed(ServiceStatus::Healthy)
    }

    pub fn is_healthy(&self) -> bool {
        self.status == ServiceStatus::Healthy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answered_classifies_http_status() {
        let ok = ServiceHealth::answered(204, Duration::from_millis(12));
        assert!(ok.is_healthy());
        assert_eq!(ok.latency, Some(Duration::from_millis(12)));
        assert!(ok.detail.is_none());

        let refused = ServiceHealth::answered(401, Duration::from_millis(3));
        assert_eq!(refused.status, ServiceStatus::Degraded);
        assert_eq!(refused.http_status, Some(401));
        assert_eq!(refused.detail.as_deref(), Some("ping returned HTTP 401"));
    }

    #[test]
    fn test_unreachable_has_no_latency() {
        let health = ServiceHealth::unreachable("connection refused");
        assert_eq!(health.status, ServiceStatus::Unhealthy);
        assert!(health.latency.is_none());
        assert!(health.http_status.is_none());
    }
}
