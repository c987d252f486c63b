use crate::errors::{Error, Result};
use crate::model::Reading;

const TEMP_MIN: f64 = -50.0;
const TEMP_MAX: f64 = 100.0;
const HUMIDITY_MIN: f64 = 0.0;
const HUMIDITY_MAX: f64 = 100.0;

/// Validates a decoded reading before it is allowed anywhere near the chart.
/// The API is trusted for shape (serde enforces that) but not for values.
pub fn validate(reading: &Reading) -> Result<()> {
    if reading.id.is_empty() {
        return Err(Error::Validation("Device ID cannot be empty".to_string()));
    }

    if reading.temperature < TEMP_MIN || reading.temperature > TEMP_MAX {
        return Err(Error::Validation(format!(
            "Temperature {} out of range [{}, {}]",
            reading.temperature, TEMP_MIN, TEMP_MAX
        )));
    }

    if reading.humidity < HUMIDITY_MIN || reading.humidity > HUMIDITY_MAX {
        return Err(Error::Validation(format!(
            "Humidity {} out of range [{}, {}]",
            reading.humidity, HUMIDITY_MIN, HUMIDITY_MAX
        )));
    }

    Ok(())
}
