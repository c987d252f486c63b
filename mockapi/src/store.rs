use crate::model::Reading;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;

/// Sampling interval of the generated history.
const INTERVAL_MINUTES: i64 = 15;

/// In-memory telemetry history, seeded once at startup.
pub struct Store {
    readings: Vec<Reading>,
}

impl Store {
    /// Generates one reading every 15 minutes per device over the given
    /// history, random-walked around room conditions so charts look like
    /// real sensor output.
    pub fn seed(
        rng: &mut impl Rng,
        now: DateTime<Utc>,
        devices: usize,
        history_days: i64,
    ) -> Self {
        let mut readings = Vec::new();

        for d in 0..devices {
            let id = format!("dev-{}", d);
            let mut temperature: f64 = rng.gen_range(15.0..30.0);
            let mut humidity: f64 = rng.gen_range(35.0..70.0);
            let mut ts = now - Duration::days(history_days);

            while ts <= now {
                temperature = (temperature + rng.gen_range(-0.5..0.5)).clamp(-10.0, 45.0);
                humidity = (humidity + rng.gen_range(-1.0..1.0)).clamp(5.0, 95.0);
                readings.push(Reading {
                    id: id.clone(),
                    timestamp: ts,
                    temperature,
                    humidity,
                });
                ts += Duration::minutes(INTERVAL_MINUTES);
            }
        }

        Self { readings }
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// All readings for `id` with a timestamp in `[start, end]` Unix seconds,
    /// bounds inclusive.
    pub fn query(&self, id: &str, start: i64, end: i64) -> Vec<Reading> {
        self.readings
            .iter()
            .filter(|r| r.id == id)
            .filter(|r| {
                let t = r.timestamp.timestamp();
                t >= start && t <= end
            })
            .cloned()
            .collect()
    }
}
