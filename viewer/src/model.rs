use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One telemetry sample as returned by the query API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reading {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub temperature: f64,
    pub humidity: f64,
}

/// The three parallel sequences handed to the chart renderer.
/// Equal lengths by construction: entry `i` of each vector derives
/// from the same source reading.
#[derive(Debug, Clone, Default)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub temperatures: Vec<f64>,
    pub humidities: Vec<f64>,
}

impl ChartSeries {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            labels: Vec::with_capacity(n),
            temperatures: Vec::with_capacity(n),
            humidities: Vec::with_capacity(n),
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
