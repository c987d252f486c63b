use crate::model::{ChartSeries, Reading};

/// Label format shown on the x-axis: UTC, no timezone suffix.
const LABEL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Turns the raw API result into the three parallel sequences the chart
/// consumes: stable sort ascending by timestamp instant, keep only the
/// requested device (the API may return rows for others), then project.
pub fn prepare(mut readings: Vec<Reading>, device_id: &str) -> ChartSeries {
    readings.sort_by_key(|r| r.timestamp);
    readings.retain(|r| r.id == device_id);

    let mut series = ChartSeries::with_capacity(readings.len());
    for r in readings {
        series
            .labels
            .push(r.timestamp.format(LABEL_FORMAT).to_string());
        series.temperatures.push(r.temperature);
        series.humidities.push(r.humidity);
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn reading(id: &str, timestamp: &str, temperature: f64, humidity: f64) -> Reading {
        Reading {
            id: id.to_string(),
            timestamp: timestamp.parse::<DateTime<Utc>>().unwrap(),
            temperature,
            humidity,
        }
    }

    #[test]
    fn test_sorts_filters_and_projects() {
        let readings = vec![
            reading("dev1", "2024-01-02T00:00:00Z", 21.5, 40.0),
            reading("dev2", "2024-01-01T12:00:00Z", 99.0, 99.0),
            reading("dev1", "2024-01-01T00:00:00Z", 20.0, 38.0),
        ];

        let series = prepare(readings, "dev1");

        assert_eq!(
            series.labels,
            vec!["2024-01-01 00:00:00", "2024-01-02 00:00:00"]
        );
        assert_eq!(series.temperatures, vec![20.0, 21.5]);
        assert_eq!(series.humidities, vec![38.0, 40.0]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_timestamps() {
        let readings = vec![
            reading("dev1", "2024-01-01T00:00:00Z", 1.0, 10.0),
            reading("dev1", "2024-01-01T00:00:00Z", 2.0, 20.0),
            reading("dev1", "2024-01-01T00:00:00Z", 3.0, 30.0),
        ];

        let series = prepare(readings, "dev1");
        assert_eq!(series.temperatures, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let readings = vec![
            reading("dev1", "2024-01-01T00:00:00Z", 20.0, 38.0),
            reading("dev2", "2024-01-02T00:00:00Z", 21.0, 39.0),
            reading("dev1", "2024-01-03T00:00:00Z", 22.0, 40.0),
        ];

        let once = prepare(readings, "dev1");

        let survivors = vec![
            reading("dev1", "2024-01-01T00:00:00Z", 20.0, 38.0),
            reading("dev1", "2024-01-03T00:00:00Z", 22.0, 40.0),
        ];
        let twice = prepare(survivors, "dev1");

        assert_eq!(once.labels, twice.labels);
        assert_eq!(once.temperatures, twice.temperatures);
        assert_eq!(once.humidities, twice.humidities);
    }

    #[test]
    fn test_projection_preserves_length() {
        let readings = vec![
            reading("dev1", "2024-01-01T00:00:00Z", 20.0, 38.0),
            reading("dev1", "2024-01-02T00:00:00Z", 21.0, 39.0),
        ];

        let series = prepare(readings, "dev1");
        assert_eq!(series.labels.len(), 2);
        assert_eq!(series.temperatures.len(), 2);
        assert_eq!(series.humidities.len(), 2);
    }

    #[test]
    fn test_empty_input_yields_empty_series() {
        let series = prepare(Vec::new(), "dev1");
        assert!(series.is_empty());
    }
}
