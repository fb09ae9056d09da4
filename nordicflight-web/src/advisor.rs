use nordicflight_core::{Alert, Drone, FALLBACK_SUMMARY, Weather};
#[cfg(not(target_arch = "wasm32"))]
use std::sync::mpsc::{self, Receiver, TryRecvError};
use tracing::info;

/// Risk summary shown on the alerts panel; requests run off the frame loop.
#[derive(Default)]
pub struct RiskSummaryTask {
    summary: Option<String>,
    #[cfg(not(target_arch = "wasm32"))]
    pending: Option<Receiver<String>>,
}

impl RiskSummaryTask {
    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    #[cfg(target_arch = "wasm32")]
    pub fn is_pending(&self) -> bool {
        false
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn request(&mut self, drones: &[Drone], weather: &Weather, alerts: &[Alert]) {
        use nordicflight_advisor::RiskAdvisor;
        use nordicflight_core::RiskSnapshot;
        use tracing::warn;

        if self.is_pending() {
            return;
        }
        info!(drones = drones.len(), alerts = alerts.len(), "requesting risk summary");

        let drones = drones.to_vec();
        let weather = weather.clone();
        let alerts = alerts.to_vec();
        let (sender, receiver) = mpsc::channel();

        std::thread::spawn(move || {
            let summary = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime.block_on(async {
                    let snapshot = RiskSnapshot::new(&drones, &weather, &alerts);
                    RiskAdvisor::from_env().summarize(&snapshot).await
                }),
                Err(err) => {
                    warn!(%err, "failed to start risk summary runtime");
                    FALLBACK_SUMMARY.to_string()
                }
            };
            let _ = sender.send(summary);
        });

        self.pending = Some(receiver);
    }

    #[cfg(target_arch = "wasm32")]
    pub fn request(&mut self, _drones: &[Drone], _weather: &Weather, alerts: &[Alert]) {
        info!(alerts = alerts.len(), "risk summary unavailable in browser builds");
        self.summary = Some(FALLBACK_SUMMARY.to_string());
    }

    /// Picks up a finished request, if any. Call once per frame.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn poll(&mut self) {
        let Some(receiver) = &self.pending else {
            return;
        };
        match receiver.try_recv() {
            Ok(summary) => {
                info!("risk summary received");
                self.summary = Some(summary);
                self.pending = None;
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                self.summary = Some(FALLBACK_SUMMARY.to_string());
                self.pending = None;
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn poll(&mut self) {}
}
