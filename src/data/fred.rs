//! FRED API integration for the industrial price index.

use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::config::AppConfig;
use crate::data::transform::{filter_after, normalize_index};
use crate::data::IndexSource;
use crate::domain::IndexPoint;
use crate::error::FetchError;

pub struct FredClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    cutoff: NaiveDate,
}

impl FredClient {
    pub fn new(client: Client, config: &AppConfig) -> Self {
        Self {
            client,
            base_url: config.fred_base_url.trim_end_matches('/').to_string(),
            api_key: config.fred_api_key.clone(),
            cutoff: config.cutoff,
        }
    }

    /// Fetch the full published series, ascending, restricted to dates after the cutoff.
    pub fn fetch_series(&self, series_id: &str) -> Result<Vec<IndexPoint>, FetchError> {
        let api_key = self.api_key.as_deref().ok_or(FetchError::MissingApiKey)?;

        tracing::info!(series_id, "fetching FRED series");
        let resp = self
            .client
            .get(format!("{}/series/observations", self.base_url))
            .query(&[
                ("series_id", series_id),
                ("api_key", api_key),
                ("file_type", "json"),
                ("sort_order", "asc"),
            ])
            .send()
            .map_err(strip_url)?;

        if !resp.status().is_success() {
            return Err(FetchError::Status(resp.status()));
        }

        let body = resp.text().map_err(strip_url)?;
        let points = parse_observations(&body)?;
        let total = points.len();
        let points = filter_after(normalize_index(points), self.cutoff);
        tracing::info!(series_id, total, kept = points.len(), cutoff = %self.cutoff, "FRED series loaded");
        Ok(points)
    }
}

impl IndexSource for FredClient {
    fn fetch_index(&self, series_id: &str) -> Result<Vec<IndexPoint>, FetchError> {
        self.fetch_series(series_id)
    }
}

/// The request URL carries the API key; keep it out of error text.
fn strip_url(err: reqwest::Error) -> FetchError {
    FetchError::Network(err.without_url())
}

#[derive(Debug, Deserialize)]
struct ObservationsResponse {
    observations: Vec<Observation>,
}

#[derive(Debug, Deserialize)]
struct Observation {
    date: String,
    value: String,
}

/// Decode an observations payload; missing values (`"."`) are skipped.
fn parse_observations(body: &str) -> Result<Vec<IndexPoint>, FetchError> {
    let body: ObservationsResponse = serde_json::from_str(body)?;

    let mut out = Vec::with_capacity(body.observations.len());
    for obs in body.observations {
        let Some(value) = parse_value(&obs.value) else {
            continue;
        };
        let date = NaiveDate::parse_from_str(&obs.date, "%Y-%m-%d")
            .map_err(|_| FetchError::InvalidDate(obs.date.clone()))?;
        out.push(IndexPoint { date, value });
    }
    Ok(out)
}

fn parse_value(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed == "." || trimmed.is_empty() {
        return None;
    }
    let v = trimmed.parse::<f64>().ok()?;
    if v.is_finite() {
        Some(v)
    } else {
        None
    }
}
