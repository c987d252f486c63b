use crate::errors::Result;
use crate::model::ChartSeries;
use plotly::color::Rgba;
use plotly::common::{Line, Mode, Title};
use plotly::layout::Axis;
use plotly::{Layout, Plot, Scatter};
use std::path::PathBuf;
use tracing::info;

/// Owns the single live chart. `render` is the only mutation entry point:
/// the previous plot is dropped the moment its replacement is swapped in,
/// so at most one chart instance exists at any time and a failed render
/// leaves the last good chart in place.
pub struct ChartView {
    out_path: PathBuf,
    current: Option<Plot>,
}

impl ChartView {
    pub fn new(out_path: PathBuf) -> Self {
        Self {
            out_path,
            current: None,
        }
    }

    /// True once at least one render has succeeded.
    pub fn has_chart(&self) -> bool {
        self.current.is_some()
    }

    /// Builds a fresh two-series line chart and writes it as a standalone
    /// HTML document. An empty series renders an empty chart, not an error.
    pub fn render(&mut self, series: &ChartSeries) -> Result<()> {
        let temperature = Scatter::new(series.labels.clone(), series.temperatures.clone())
            .name("Temperature (Celsius)")
            .mode(Mode::Lines)
            .line(Line::new().color(Rgba::new(255, 99, 132, 1.0)).width(2.0));
        let humidity = Scatter::new(series.labels.clone(), series.humidities.clone())
            .name("Humidity (%)")
            .mode(Mode::Lines)
            .line(Line::new().color(Rgba::new(54, 162, 235, 1.0)).width(2.0));

        let mut plot = Plot::new();
        plot.add_trace(temperature);
        plot.add_trace(humidity);
        plot.set_layout(
            Layout::new()
                .x_axis(
                    Axis::new()
                        .title(Title::with_text("Time (UTC)"))
                        .tick_angle(45.0),
                )
                .y_axis(Axis::new().title(Title::with_text("Values"))),
        );

        std::fs::write(&self.out_path, plot.to_html())?;
        // Swap only once the replacement is safely on disk.
        self.current = Some(plot);

        info!(
            "Rendered {} points to {}",
            series.len(),
            self.out_path.display()
        );
        Ok(())
    }
}
