//! NYC Open Data (Socrata) integration for monthly DSNY tonnage.
//!
//! Pipeline: raw JSON records -> month parse -> `refuse + paper` per record
//! -> monthly sum -> cutoff filter.

use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::config::AppConfig;
use crate::data::transform::{aggregate_monthly, filter_after, parse_month};
use crate::data::WasteSource;
use crate::domain::{NullTonnage, WasteMonthTotal};
use crate::error::FetchError;

const FIELD_MONTH: &str = "month";
const FIELD_REFUSE: &str = "refusetonscollected";
const FIELD_PAPER: &str = "papertonscollected";

/// One raw row of the tonnage dataset. Fields the dashboard does not use are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WasteRecord {
    #[serde(default)]
    pub month: Option<String>,
    #[serde(default)]
    pub borough: Option<String>,
    #[serde(default)]
    pub communitydistrict: Option<String>,
    #[serde(default)]
    pub refusetonscollected: Option<Tonnage>,
    #[serde(default)]
    pub papertonscollected: Option<Tonnage>,
}

/// Socrata serializes numbers as strings; accept both encodings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Tonnage {
    Number(f64),
    Text(String),
}

impl Tonnage {
    fn as_f64(&self) -> Option<f64> {
        let v = match self {
            Tonnage::Number(v) => *v,
            Tonnage::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        v.is_finite().then_some(v)
    }

    fn raw(&self) -> String {
        match self {
            Tonnage::Number(v) => v.to_string(),
            Tonnage::Text(s) => s.clone(),
        }
    }
}

pub struct WasteClient {
    client: Client,
    url: String,
    limit: usize,
    cutoff: NaiveDate,
    null_tonnage: NullTonnage,
}

impl WasteClient {
    pub fn new(client: Client, config: &AppConfig) -> Self {
        Self {
            client,
            url: config.waste_url.clone(),
            limit: config.waste_limit,
            cutoff: config.cutoff,
            null_tonnage: config.null_tonnage,
        }
    }

    /// Fetch raw records and reduce them to ascending monthly totals after the cutoff.
    pub fn fetch_monthly(&self) -> Result<Vec<WasteMonthTotal>, FetchError> {
        let records = self.fetch_records()?;
        let totals = monthly_totals(&records, self.null_tonnage, self.cutoff)?;
        tracing::info!(
            records = records.len(),
            months = totals.len(),
            cutoff = %self.cutoff,
            "waste tonnage loaded"
        );
        Ok(totals)
    }

    fn fetch_records(&self) -> Result<Vec<WasteRecord>, FetchError> {
        tracing::info!(url = %self.url, limit = self.limit, "fetching waste records");
        let resp = self
            .client
            .get(&self.url)
            .query(&[("$limit", self.limit.to_string())])
            .send()?;

        if !resp.status().is_success() {
            return Err(FetchError::Status(resp.status()));
        }

        let body = resp.text()?;
        let records: Vec<WasteRecord> = serde_json::from_str(&body)?;
        if records.len() >= self.limit {
            tracing::warn!(
                limit = self.limit,
                "waste query hit its record limit; older months may be missing"
            );
        }
        Ok(records)
    }
}

impl WasteSource for WasteClient {
    fn fetch_waste(&self) -> Result<Vec<WasteMonthTotal>, FetchError> {
        self.fetch_monthly()
    }
}

/// Derive `refuse + paper` per record, sum per month, and keep months after `cutoff`.
///
/// Any malformed record fails the whole batch; absent tonnage fields follow `nulls`:
/// `fail` rejects the batch, `skip` drops the record, `zero` counts the field as 0.
pub fn monthly_totals(
    records: &[WasteRecord],
    nulls: NullTonnage,
    cutoff: NaiveDate,
) -> Result<Vec<WasteMonthTotal>, FetchError> {
    let mut rows = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        let raw_month = record.month.as_deref().ok_or(FetchError::MissingField {
            index,
            field: FIELD_MONTH,
        })?;
        let month = parse_month(raw_month).ok_or_else(|| FetchError::InvalidMonth {
            index,
            value: raw_month.to_string(),
        })?;

        let refuse = tonnage(record.refusetonscollected.as_ref(), index, FIELD_REFUSE, nulls)?;
        let paper = tonnage(record.papertonscollected.as_ref(), index, FIELD_PAPER, nulls)?;
        // A skipped record still registers its month, contributing nothing.
        let tons = match (refuse, paper) {
            (Some(refuse), Some(paper)) => refuse + paper,
            _ => {
                tracing::debug!(index, "skipping record with missing tonnage");
                0.0
            }
        };
        rows.push((month, tons));
    }

    Ok(filter_after(aggregate_monthly(rows), cutoff))
}

fn tonnage(
    value: Option<&Tonnage>,
    index: usize,
    field: &'static str,
    nulls: NullTonnage,
) -> Result<Option<f64>, FetchError> {
    match value {
        Some(t) => t.as_f64().map(Some).ok_or_else(|| FetchError::InvalidTonnage {
            index,
            field,
            value: t.raw(),
        }),
        None => match nulls {
            NullTonnage::Fail => Err(FetchError::MissingField { index, field }),
            NullTonnage::Skip => Ok(None),
            NullTonnage::Zero => Ok(Some(0.0)),
        },
    }
}
