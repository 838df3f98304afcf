//! selgrid-core — shared types for the Selenium Grid exporter.
//!
//! Holds the exporter configuration, the supported Selenium Grid API
//! variants (request shape, published gauges, response schema) and the
//! error types shared by the fetcher and the collector.
//!
//! # Grid API variants
//!
//! ```text
//! GridApi
//!   ├── Graphql       POST /graphql   totalSlots, maxSession, sessionCount, sessionQueueSize
//!   ├── GraphqlUsage  POST /graphql   totalSlots, usedSlots, sessionCount
//!   └── HubApi        GET /grid/api/hub   slotsTotal, slotsFree, sessions_backlog
//! ```
//!
//! Exactly one variant is active per deployment.

pub mod config;
pub mod error;
pub mod grid;

pub use config::ExporterConfig;
pub use error::{ConfigError, DecodeError, FetchError, ScrapeError};
pub use grid::{GaugeDesc, GridApi, HubRequest, ScrapeResult};
