//! Scrape-on-read collector.
//!
//! There is no background polling: each [`Exporter::collect`] call locks
//! the gauge set, scrapes the hub, and renders the result before
//! releasing the lock. Concurrent readers queue on the lock and each
//! performs its own scrape.

use tokio::sync::Mutex;
use tracing::{debug, error, info};

use selgrid_core::{ExporterConfig, FetchError, GridApi, ScrapeError};
use selgrid_fetch::HubClient;

use crate::gauges::GaugeSet;
use crate::prometheus::render_prometheus;

/// Publishes Selenium Grid hub counters as gauges.
pub struct Exporter {
    client: HubClient,
    gauges: Mutex<GaugeSet>,
}

impl Exporter {
    /// Create an exporter around an existing hub client.
    pub fn new(client: HubClient) -> Self {
        let gauges = GaugeSet::new(client.api().gauges());
        info!(uri = %client.endpoint(), api = %client.api(), "collecting data from Selenium Grid");
        Self {
            client,
            gauges: Mutex::new(gauges),
        }
    }

    /// Create an exporter for the configured scrape URI and grid API.
    pub fn from_config(config: &ExporterConfig) -> Result<Self, FetchError> {
        let client = HubClient::new(&config.scrape_uri, config.grid_api)?;
        Ok(Self::new(client))
    }

    pub fn api(&self) -> GridApi {
        self.client.api()
    }

    /// Scrape the hub and render every gauge in text exposition format.
    ///
    /// Scrape failures are logged and reflected in the output (`up` 0 or
    /// zeroed gauges); the call itself always produces a body.
    pub async fn collect(&self) -> String {
        let mut gauges = self.gauges.lock().await;
        let _ = self.scrape_into(&mut gauges).await;
        render_prometheus(&gauges)
    }

    /// Scrape the hub and update the gauge set without rendering.
    pub async fn scrape(&self) -> Result<(), ScrapeError> {
        let mut gauges = self.gauges.lock().await;
        self.scrape_into(&mut gauges).await
    }

    /// Copy of the current gauge values.
    pub async fn snapshot(&self) -> GaugeSet {
        self.gauges.lock().await.clone()
    }

    async fn scrape_into(&self, gauges: &mut GaugeSet) -> Result<(), ScrapeError> {
        // Stale values must not survive a failed scrape.
        gauges.reset();

        let body = match self.client.fetch().await {
            Ok(body) => body,
            Err(e) => {
                gauges.set_up(false);
                let err = ScrapeError::from(e);
                error!(error = %err, uri = %self.client.endpoint(), "scrape failed");
                return Err(err);
            }
        };

        gauges.set_up(true);

        let result = match self.client.api().decode(&body) {
            Ok(result) => result,
            Err(e) => {
                let err = ScrapeError::from(e);
                error!(error = %err, uri = %self.client.endpoint(), bytes = body.len(), "scrape failed");
                return Err(err);
            }
        };

        gauges.apply(&result);
        debug!(uri = %self.client.endpoint(), values = ?result, "scrape succeeded");
        Ok(())
    }
}
