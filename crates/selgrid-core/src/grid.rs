//! Selenium Grid API variants.
//!
//! Each variant knows which request to send to the hub, which gauges it
//! publishes, and how to decode the hub's JSON answer into a
//! [`ScrapeResult`]. Decoding is lenient about shape: missing fields and
//! missing or `null` parent objects read as zero, unknown fields are
//! ignored. Bodies that are not JSON, or fields holding non-numbers, are
//! rejected.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{ConfigError, DecodeError};

/// Static description of a published gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GaugeDesc {
    /// Fully qualified metric name.
    pub name: &'static str,
    /// `# HELP` text.
    pub help: &'static str,
}

/// The scrape health gauge, published for every variant.
pub const UP: GaugeDesc = GaugeDesc {
    name: "selenium_grid_up",
    help: "was the last scrape of Selenium Grid successful.",
};

pub const TOTAL_SLOTS: GaugeDesc = GaugeDesc {
    name: "selenium_grid_hub_totalSlots",
    help: "total number of slots",
};

pub const MAX_SESSION: GaugeDesc = GaugeDesc {
    name: "selenium_grid_hub_maxSession",
    help: "maximum number of sessions",
};

pub const SESSION_COUNT: GaugeDesc = GaugeDesc {
    name: "selenium_grid_hub_sessionCount",
    help: "number of active sessions",
};

pub const SESSION_QUEUE_SIZE: GaugeDesc = GaugeDesc {
    name: "selenium_grid_hub_sessionQueueSize",
    help: "number of queued sessions",
};

pub const USED_SLOTS: GaugeDesc = GaugeDesc {
    name: "selenium_grid_hub_usedSlots",
    help: "number of used slots",
};

pub const SLOTS_TOTAL: GaugeDesc = GaugeDesc {
    name: "selenium_grid_hub_slotsTotal",
    help: "total number of slots",
};

pub const SLOTS_FREE: GaugeDesc = GaugeDesc {
    name: "selenium_grid_hub_slotsFree",
    help: "number of free slots",
};

pub const SESSIONS_BACKLOG: GaugeDesc = GaugeDesc {
    name: "selenium_grid_hub_sessions_backlog",
    help: "number of sessions waiting for a free slot",
};

static GRAPHQL_GAUGES: [GaugeDesc; 4] = [TOTAL_SLOTS, MAX_SESSION, SESSION_COUNT, SESSION_QUEUE_SIZE];
static GRAPHQL_USAGE_GAUGES: [GaugeDesc; 3] = [TOTAL_SLOTS, USED_SLOTS, SESSION_COUNT];
static HUB_API_GAUGES: [GaugeDesc; 3] = [SLOTS_TOTAL, SLOTS_FREE, SESSIONS_BACKLOG];

const GRAPHQL_PATH: &str = "/graphql";
const HUB_API_PATH: &str = "/grid/api/hub";

/// Which Selenium Grid status API the exporter talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridApi {
    /// Grid 4 GraphQL with capacity and queue counters.
    #[default]
    Graphql,
    /// Grid 4 GraphQL with slot usage counters.
    GraphqlUsage,
    /// Grid 3 hub status endpoint.
    HubApi,
}

/// The HTTP call a variant makes against the hub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HubRequest {
    Get { path: &'static str },
    /// JSON body, sent with `Content-Type: application/json`.
    Post { path: &'static str, body: String },
}

impl HubRequest {
    /// Path appended to the configured scrape URI.
    pub fn path(&self) -> &'static str {
        match self {
            HubRequest::Get { path } | HubRequest::Post { path, .. } => *path,
        }
    }
}

impl GridApi {
    pub const ALL: [GridApi; 3] = [GridApi::Graphql, GridApi::GraphqlUsage, GridApi::HubApi];

    pub fn as_str(&self) -> &'static str {
        match self {
            GridApi::Graphql => "graphql",
            GridApi::GraphqlUsage => "graphql-usage",
            GridApi::HubApi => "hub-api",
        }
    }

    /// Build the request for this variant.
    pub fn request(&self) -> HubRequest {
        match self {
            GridApi::Graphql => graphql_request("{ grid {totalSlots, maxSession, sessionCount, sessionQueueSize} }"),
            GridApi::GraphqlUsage => graphql_request("{ grid {totalSlots, usedSlots, sessionCount} }"),
            GridApi::HubApi => HubRequest::Get { path: HUB_API_PATH },
        }
    }

    /// Gauges published by this variant, in exposition order. Excludes `up`.
    pub fn gauges(&self) -> &'static [GaugeDesc] {
        match self {
            GridApi::Graphql => &GRAPHQL_GAUGES,
            GridApi::GraphqlUsage => &GRAPHQL_USAGE_GAUGES,
            GridApi::HubApi => &HUB_API_GAUGES,
        }
    }

    /// Decode a hub response body.
    pub fn decode(&self, body: &[u8]) -> Result<ScrapeResult, DecodeError> {
        match self {
            GridApi::Graphql => {
                let raw: RawGridStatus = decode_graphql(body)?;
                Ok(ScrapeResult::Graphql(GridStatus {
                    total_slots: raw.total_slots.unwrap_or_default(),
                    max_session: raw.max_session.unwrap_or_default(),
                    session_count: raw.session_count.unwrap_or_default(),
                    session_queue_size: raw.session_queue_size.unwrap_or_default(),
                }))
            }
            GridApi::GraphqlUsage => {
                let raw: RawGridUsage = decode_graphql(body)?;
                Ok(ScrapeResult::GraphqlUsage(GridUsage {
                    total_slots: raw.total_slots.unwrap_or_default(),
                    used_slots: raw.used_slots.unwrap_or_default(),
                    session_count: raw.session_count.unwrap_or_default(),
                }))
            }
            GridApi::HubApi => {
                let raw: Option<RawHubStatus> = serde_json::from_slice(body)?;
                let raw = raw.unwrap_or_default();
                let slots = raw.slot_counts.unwrap_or_default();
                Ok(ScrapeResult::HubApi(HubStatus {
                    slots_total: slots.total.unwrap_or_default(),
                    slots_free: slots.free.unwrap_or_default(),
                    sessions_backlog: raw.new_session_request_count.unwrap_or_default(),
                }))
            }
        }
    }
}

impl fmt::Display for GridApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GridApi {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GridApi::ALL
            .into_iter()
            .find(|api| api.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownGridApi(s.to_string()))
    }
}

fn graphql_request(query: &str) -> HubRequest {
    HubRequest::Post {
        path: GRAPHQL_PATH,
        body: serde_json::json!({ "query": query }).to_string(),
    }
}

/// Decoded hub answer, one shape per [`GridApi`] variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrapeResult {
    Graphql(GridStatus),
    GraphqlUsage(GridUsage),
    HubApi(HubStatus),
}

impl ScrapeResult {
    /// Gauge values carried by this result, identity-mapped from the response.
    pub fn values(&self) -> Vec<(&'static GaugeDesc, f64)> {
        match self {
            ScrapeResult::Graphql(s) => vec![
                (&GRAPHQL_GAUGES[0], s.total_slots),
                (&GRAPHQL_GAUGES[1], s.max_session),
                (&GRAPHQL_GAUGES[2], s.session_count),
                (&GRAPHQL_GAUGES[3], s.session_queue_size),
            ],
            ScrapeResult::GraphqlUsage(s) => vec![
                (&GRAPHQL_USAGE_GAUGES[0], s.total_slots),
                (&GRAPHQL_USAGE_GAUGES[1], s.used_slots),
                (&GRAPHQL_USAGE_GAUGES[2], s.session_count),
            ],
            ScrapeResult::HubApi(s) => vec![
                (&HUB_API_GAUGES[0], s.slots_total),
                (&HUB_API_GAUGES[1], s.slots_free),
                (&HUB_API_GAUGES[2], s.sessions_backlog),
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GridStatus {
    pub total_slots: f64,
    pub max_session: f64,
    pub session_count: f64,
    pub session_queue_size: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GridUsage {
    pub total_slots: f64,
    pub used_slots: f64,
    pub session_count: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HubStatus {
    pub slots_total: f64,
    pub slots_free: f64,
    pub sessions_backlog: f64,
}

// ── Wire shapes ────────────────────────────────────────────────

#[derive(Deserialize)]
struct GraphqlEnvelope<T> {
    data: Option<GraphqlData<T>>,
}

#[derive(Deserialize)]
struct GraphqlData<T> {
    grid: Option<T>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawGridStatus {
    total_slots: Option<f64>,
    max_session: Option<f64>,
    session_count: Option<f64>,
    session_queue_size: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawGridUsage {
    total_slots: Option<f64>,
    used_slots: Option<f64>,
    session_count: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawHubStatus {
    slot_counts: Option<RawSlotCounts>,
    new_session_request_count: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct RawSlotCounts {
    free: Option<f64>,
    total: Option<f64>,
}

fn decode_graphql<T: DeserializeOwned + Default>(body: &[u8]) -> Result<T, DecodeError> {
    let envelope: Option<GraphqlEnvelope<T>> = serde_json::from_slice(body)?;
    Ok(envelope
        .and_then(|e| e.data)
        .and_then(|d| d.grid)
        .unwrap_or_default())
}
