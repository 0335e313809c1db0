use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{debug, info};

use crate::error::FetchError;
use crate::report::model::RawReport;

/// Default compliance reports endpoint; the report id is appended
pub const DEFAULT_BASE_URL: &str = "https://app.feroot.com/api/v1/platform/compliance/reports/";

/// Blocking client for the compliance reports API
pub struct ReportClient {
    client: Client,
    base_url: String,
}

impl ReportClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("pcireport/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchError::Network)?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    pub fn report_url(&self, report_id: &str) -> String {
        if self.base_url.ends_with('/') {
            format!("{}{}", self.base_url, report_id)
        } else {
            format!("{}/{}", self.base_url, report_id)
        }
    }

    /// Fetch and parse a report. Any non-2xx status is an error.
    pub fn fetch(&self, api_key: &str, report_id: &str) -> Result<RawReport, FetchError> {
        let url = self.report_url(report_id);
        info!("Fetching report {}", report_id);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header("X-Api-Key", api_key)
            .send()
            .map_err(FetchError::Network)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(FetchError::Status { status, body });
        }

        let body = response.text().map_err(FetchError::Network)?;
        let report = parse_report(&body)?;
        debug!(
            "Report has {} scripts, {} headers, {} data assets",
            report.content.scripts.len(),
            report.content.headers.len(),
            report.content.data_assets.len()
        );
        Ok(report)
    }
}

/// Parse a report document from JSON text
pub fn parse_report(body: &str) -> Result<RawReport, FetchError> {
    serde_json::from_str(body).map_err(|e| FetchError::Malformed(e.to_string()))
}
