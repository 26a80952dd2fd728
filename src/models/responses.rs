//! Response DTOs for the admin API
//!
//! Defines the structure of outgoing JSON response bodies.

use serde::Serialize;

use crate::cache::StoreStats;
use crate::group::GroupStatsSnapshot;

/// Response body for GET /api/:group/:key
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// Group the key was read from
    pub group: String,
    /// The requested key
    pub key: String,
    /// The value, lossily decoded as UTF-8
    pub value: String,
}

impl GetResponse {
    /// Creates a new GetResponse
    pub fn new(group: impl Into<String>, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Response body for GET /stats/:group
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Group name
    pub name: String,
    /// Read-path counters
    pub group: GroupStatsSnapshot,
    /// Local store counters
    pub store: StoreStats,
    /// Fraction of gets served from the local store
    pub hit_rate: f64,
}

impl StatsResponse {
    /// Creates a new StatsResponse from group and store statistics
    pub fn new(name: impl Into<String>, group: GroupStatsSnapshot, store: StoreStats) -> Self {
        let hit_rate = if group.gets > 0 {
            group.hits as f64 / group.gets as f64
        } else {
            0.0
        };
        Self {
            name: name.into(),
            group,
            store,
            hit_rate,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Groups served by this node
    pub groups: Vec<String>,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy(groups: Vec<String>) -> Self {
        Self {
            status: "healthy".to_string(),
            groups,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_response_serialize() {
        let resp = GetResponse::new("scores", "Tom", "630");
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["group"], "scores");
        assert_eq!(json["key"], "Tom");
        assert_eq!(json["value"], "630");
    }

    #[test]
    fn test_stats_response_hit_rate() {
        let group = GroupStatsSnapshot {
            gets: 10,
            hits: 8,
            ..Default::default()
        };
        let resp = StatsResponse::new("scores", group, StoreStats::new());
        assert!((resp.hit_rate - 0.8).abs() < 0.001);
    }

    #[test]
    fn test_stats_response_zero_requests() {
        let resp = StatsResponse::new("scores", GroupStatsSnapshot::default(), StoreStats::new());
        assert_eq!(resp.hit_rate, 0.0);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy(vec!["scores".to_string()]);
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("scores"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_error_response_serialize() {
        let resp = ErrorResponse::new("Group not found: nope");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("error"));
        assert!(json.contains("Group not found: nope"));
    }
}
