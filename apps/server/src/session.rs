use std::sync::Arc;

use curve_protocol::client::OptimizerClient;
use curve_protocol::error::SessionError;
use curve_protocol::model::{BasicSettings, HourlySchedule, ScheduleRequest};
use curve_protocol::schedule::{advanced_request, basic_request, validate};
use curve_protocol::state::{Tab, UiState};
use log::{error, info};
use tokio::sync::RwLock;

/// The demo's event handlers. Each one swaps the shared `UiState` for the
/// next value; the lock is never held across the optimizer round trip.
///
/// There is a single session per server: every browser talking to it sees
/// the same state, and `retry` re-sends whichever request was made last. This
/// is a single-user demo.
#[derive(Clone)]
pub struct Session {
    state: Arc<RwLock<UiState>>,
    client: OptimizerClient,
}

impl Session {
    pub fn new(client: OptimizerClient) -> Self {
        Self { state: Arc::new(RwLock::new(UiState::default())), client }
    }

    pub async fn snapshot(&self) -> UiState {
        self.state.read().await.clone()
    }

    pub async fn calculate_basic(&self, settings: &BasicSettings) -> Result<UiState, SessionError> {
        validate(settings)?;
        let request = basic_request(settings)?;
        self.perform(request).await
    }

    // The hourly form replaces the generated bounds; the range checks of the
    // basic form do not apply here.
    pub async fn calculate_advanced(
        &self,
        settings: &BasicSettings,
        hourly: &HourlySchedule,
    ) -> Result<UiState, SessionError> {
        let request = advanced_request(settings, hourly)?;
        self.perform(request).await
    }

    /// Sends the last request again.
    pub async fn retry(&self) -> Result<UiState, SessionError> {
        let last = self.state.read().await.last_request.clone();
        let request = last.ok_or(SessionError::NothingToRetry)?;
        self.perform(request).await
    }

    pub async fn try_another(&self) -> UiState {
        self.update(|s| s.try_another()).await
    }

    pub async fn switch_tab(&self, tab: Tab) -> UiState {
        self.update(|s| s.switch_tab(tab)).await
    }

    async fn update(&self, event: impl FnOnce(&UiState) -> UiState) -> UiState {
        let mut state = self.state.write().await;
        *state = event(&*state);
        state.clone()
    }

    async fn perform(&self, request: ScheduleRequest) -> Result<UiState, SessionError> {
        let ticket = {
            let mut state = self.state.write().await;
            let (next, ticket) = state.begin(request.clone())?;
            *state = next;
            ticket
        };

        info!(
            "optimization #{}: {} sq ft, {:.1}F, location {}, level {}",
            ticket.seq, request.home_size, request.home_temperature, request.location, request.savings_level
        );

        // The exchange runs on its own task so the ticket is settled even when
        // the caller is dropped halfway.
        let session = self.clone();
        let exchange = tokio::spawn(async move {
            let outcome = session.client.submit(&request).await;
            session.update(|s| s.complete(ticket, outcome)).await
        });

        match exchange.await {
            Ok(state) => Ok(state),
            Err(e) => {
                error!("optimization #{} aborted: {}", ticket.seq, e);
                Ok(self.update(|s| s.abandon(ticket)).await)
            }
        }
    }
}
