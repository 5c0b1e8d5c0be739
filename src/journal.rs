//! Growth journal for real microgreen batches: sowing records, dated growth
//! logs and the statistics derived from them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MicrogreenBatch {
    pub id: u64,
    pub name: String,
    pub sowing_date: NaiveDate,
    pub substrate: String,
    /// Days from sowing until the batch is ready to cut.
    pub harvest_days: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthLog {
    pub id: u64,
    pub date: NaiveDate,
    #[serde(default)]
    pub changes: String,
    pub height_cm: f64,
    #[serde(default)]
    pub watering_notes: String,
    #[serde(default)]
    pub lighting_notes: String,
    #[serde(default)]
    pub humidity_notes: String,
}

impl GrowthLog {
    /// Humidity notes are free text. Only a bare number charts; anything
    /// else, including "55%", charts as zero.
    pub fn humidity_percent(&self) -> f64 {
        self.humidity_notes.parse::<f64>().unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BatchProgress {
    pub days_since_sowing: u32,
    pub days_until_harvest: u32,
    pub progress: f64,
    pub ready_to_harvest: bool,
}

impl BatchProgress {
    pub fn compute(batch: &MicrogreenBatch, today: NaiveDate) -> Self {
        let days_since_sowing = (today - batch.sowing_date).num_days().max(0) as u32;
        let days_until_harvest = batch.harvest_days.saturating_sub(days_since_sowing);
        let progress = if batch.harvest_days == 0 {
            1.0
        } else {
            (days_since_sowing as f64 / batch.harvest_days as f64).min(1.0)
        };
        Self {
            days_since_sowing,
            days_until_harvest,
            progress,
            ready_to_harvest: days_since_sowing >= batch.harvest_days,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    #[error("journal decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GrowthJournal {
    logs: Vec<GrowthLog>,
}

impl GrowthJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(text: &str) -> Result<Self, JournalError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String, JournalError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn len(&self) -> usize {
        self.logs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }

    /// Adds a log with the next free id and returns that id.
    pub fn add(&mut self, mut log: GrowthLog) -> u64 {
        let id = self.logs.iter().map(|l| l.id).max().map_or(1, |max| max + 1);
        log.id = id;
        self.logs.push(log);
        id
    }

    pub fn delete(&mut self, id: u64) -> Option<GrowthLog> {
        let index = self.logs.iter().position(|l| l.id == id)?;
        Some(self.logs.remove(index))
    }

    pub fn newest_first(&self) -> Vec<&GrowthLog> {
        let mut logs: Vec<&GrowthLog> = self.logs.iter().collect();
        logs.sort_by(|a, b| b.date.cmp(&a.date));
        logs
    }

    fn oldest_first(&self) -> Vec<&GrowthLog> {
        let mut logs: Vec<&GrowthLog> = self.logs.iter().collect();
        logs.sort_by_key(|l| l.date);
        logs
    }

    pub fn height_series(&self) -> Vec<(NaiveDate, f64)> {
        self.oldest_first()
            .into_iter()
            .map(|l| (l.date, l.height_cm))
            .collect()
    }

    pub fn humidity_series(&self) -> Vec<(NaiveDate, f64)> {
        self.oldest_first()
            .into_iter()
            .map(|l| (l.date, l.humidity_percent()))
            .collect()
    }

    /// Centimetres per day between the first and last log, if they are at
    /// least a day apart.
    pub fn average_daily_growth(&self) -> Option<f64> {
        let series = self.height_series();
        let (first_date, first_height) = *series.first()?;
        let (last_date, last_height) = *series.last()?;
        let days = (last_date - first_date).num_days();
        if days <= 0 {
            return None;
        }
        Some((last_height - first_height) / days as f64)
    }
}

/// Case-insensitive name search; an empty query keeps every batch.
pub fn filter_batches<'a>(batches: &'a [MicrogreenBatch], query: &str) -> Vec<&'a MicrogreenBatch> {
    let needle = query.trim().to_lowercase();
    batches
        .iter()
        .filter(|b| needle.is_empty() || b.name.to_lowercase().contains(&needle))
        .collect()
}
