//! selgrid-metrics — gauges for the Selenium Grid exporter.
//!
//! Every metrics read triggers a fresh scrape of the hub. The gauge set
//! is owned by the [`Exporter`] behind a mutex; the scrape and the
//! rendering of the response happen under the same lock, so a reader
//! never sees values from two different scrapes.
//!
//! # Architecture
//!
//! ```text
//! Exporter
//!   ├── collect() ← called per /metrics request
//!   │   ├── lock GaugeSet
//!   │   ├── scrape: reset → HubClient::fetch() → GridApi::decode() → apply
//!   │   └── render_prometheus() → text/plain body
//!   └── snapshot() → copy of the current GaugeSet
//! ```

pub mod exporter;
pub mod gauges;
pub mod prometheus;

pub use exporter::Exporter;
pub use gauges::GaugeSet;
pub use prometheus::{CONTENT_TYPE, render_prometheus};
