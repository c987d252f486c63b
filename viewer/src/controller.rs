use crate::chart::ChartView;
use crate::client::ApiClient;
use crate::errors::{Error, Result};
use crate::model::Reading;
use crate::range;
use crate::series;
use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

/// UI events driving the viewer, one per control the user can touch:
/// the device selector, the start/end inputs, the reset button, and the
/// load trigger itself. The CLI emits `Reload` (and `Reset` under
/// `--follow`); `DeviceChanged` and `RangeChanged` are for embedders that
/// expose those controls.
#[derive(Debug)]
pub enum UiEvent {
    DeviceChanged(String),
    RangeChanged { start: String, end: String },
    Reset,
    Reload,
}

#[derive(Debug)]
struct FetchOutcome {
    request_id: u64,
    device_id: String,
    result: Result<Vec<Reading>>,
}

/// View controller: owns the API client, the chart, and the current form
/// state. Every reload is tagged with a monotonically increasing request id;
/// a completed fetch whose id is not the latest issued one is discarded, so
/// overlapping in-flight fetches can never paint an earlier selection over a
/// later one.
pub struct Viewer {
    client: ApiClient,
    chart: ChartView,
    device_id: String,
    start_input: String,
    end_input: String,
    latest_request: u64,
}

impl Viewer {
    pub fn new(client: ApiClient, chart: ChartView) -> Self {
        let (start_input, end_input) = range::default_inputs(Utc::now());
        Self {
            client,
            chart,
            device_id: String::new(),
            start_input,
            end_input,
            latest_request: 0,
        }
    }

    pub fn set_device(&mut self, device_id: String) {
        self.device_id = device_id;
    }

    pub fn set_inputs(&mut self, start: String, end: String) {
        self.start_input = start;
        self.end_input = end;
    }

    /// Single fetch-and-render pass. The device must be selected and the
    /// inputs well-formed before any network call is made.
    pub async fn load_once(&mut self) -> Result<()> {
        if self.device_id.is_empty() {
            return Err(Error::MissingParameter("device id"));
        }
        let range = range::parse_inputs(&self.start_input, &self.end_input)?;

        let readings = self.client.fetch_readings(&self.device_id, &range).await?;
        let series = series::prepare(readings, &self.device_id);
        self.chart.render(&series)
    }

    /// Event loop. Fetches run as spawned tasks so a slow response never
    /// blocks later events; stale outcomes are dropped in `apply`. Returns
    /// once the event channel closes and all in-flight fetches have settled.
    pub async fn run(mut self, mut events: mpsc::Receiver<UiEvent>) {
        let (done_tx, mut done_rx) = mpsc::channel::<FetchOutcome>(16);
        let mut in_flight = 0usize;

        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => {
                        if let Err(e) = self.handle_event(event, &done_tx, &mut in_flight) {
                            warn!("Reload skipped: {}", e);
                        }
                    }
                    None => break,
                },
                Some(outcome) = done_rx.recv() => {
                    in_flight -= 1;
                    self.apply(outcome);
                }
            }
        }

        // Let the last issued request land before shutting down.
        while in_flight > 0 {
            match done_rx.recv().await {
                Some(outcome) => {
                    in_flight -= 1;
                    self.apply(outcome);
                }
                None => break,
            }
        }
    }

    fn handle_event(
        &mut self,
        event: UiEvent,
        done_tx: &mpsc::Sender<FetchOutcome>,
        in_flight: &mut usize,
    ) -> Result<()> {
        match event {
            UiEvent::DeviceChanged(device_id) => {
                self.device_id = device_id;
                self.spawn_reload(done_tx, in_flight)
            }
            UiEvent::RangeChanged { start, end } => {
                self.start_input = start;
                self.end_input = end;
                Ok(())
            }
            UiEvent::Reset => {
                let (start, end) = range::default_inputs(Utc::now());
                self.start_input = start;
                self.end_input = end;
                self.spawn_reload(done_tx, in_flight)
            }
            UiEvent::Reload => self.spawn_reload(done_tx, in_flight),
        }
    }

    fn spawn_reload(
        &mut self,
        done_tx: &mpsc::Sender<FetchOutcome>,
        in_flight: &mut usize,
    ) -> Result<()> {
        if self.device_id.is_empty() {
            return Err(Error::MissingParameter("device id"));
        }
        let range = range::parse_inputs(&self.start_input, &self.end_input)?;

        self.latest_request += 1;
        let request_id = self.latest_request;
        let client = self.client.clone();
        let device_id = self.device_id.clone();
        let tx = done_tx.clone();
        *in_flight += 1;

        tokio::spawn(async move {
            let result = client.fetch_readings(&device_id, &range).await;
            // A closed receiver means the viewer is shutting down.
            let _ = tx
                .send(FetchOutcome {
                    request_id,
                    device_id,
                    result,
                })
                .await;
        });
        Ok(())
    }

    fn apply(&mut self, outcome: FetchOutcome) {
        if outcome.request_id != self.latest_request {
            debug!(
                "Discarding stale response for request {} (latest is {})",
                outcome.request_id, self.latest_request
            );
            return;
        }

        match outcome.result {
            Ok(readings) => {
                let series = series::prepare(readings, &outcome.device_id);
                if let Err(e) = self.chart.render(&series) {
                    error!("Chart render failed: {}", e);
                }
            }
            // Previous chart, if any, stays on screen.
            Err(e) => error!("Error fetching data: {}", e),
        }
    }
}
