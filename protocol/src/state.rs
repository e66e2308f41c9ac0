use log::{error, warn};
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, SessionError, GENERIC_FAILURE_MESSAGE};
use crate::model::{ScheduleRequest, ScheduleResult};
use crate::render::{self, Chart, Summary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Basic,
    Advanced,
    Results,
}

/// What the results panel currently shows.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum View {
    #[default]
    Idle,
    Loading,
    Error { message: String },
    Results { summary: Summary },
}

/// Marks the one outstanding request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Ticket {
    pub seq: u64,
}

/// Everything the demo remembers between events.
///
/// Values are never mutated in place: every event produces the next state.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UiState {
    pub tab: Tab,
    pub results_enabled: bool,
    pub in_flight: Option<Ticket>,
    pub view: View,
    pub chart: Option<Chart>,
    #[serde(skip)]
    pub last_request: Option<ScheduleRequest>,
    #[serde(skip)]
    next_seq: u64,
}

impl UiState {
    pub fn is_calculating(&self) -> bool {
        self.in_flight.is_some()
    }

    /// The results tab is only reachable once results are enabled.
    pub fn switch_tab(&self, tab: Tab) -> UiState {
        if tab == Tab::Results && !self.results_enabled {
            warn!("results tab is disabled, staying on {:?}", self.tab);
            return self.clone();
        }
        UiState { tab, ..self.clone() }
    }

    /// Enabling the results tab also moves to it.
    pub fn enable_results(&self, enabled: bool) -> UiState {
        let next = UiState { results_enabled: enabled, ..self.clone() };
        if enabled {
            next.switch_tab(Tab::Results)
        } else {
            next
        }
    }

    pub fn try_another(&self) -> UiState {
        self.switch_tab(Tab::Basic).enable_results(false)
    }

    /// Starts a request unless one is already outstanding.
    pub fn begin(&self, request: ScheduleRequest) -> Result<(UiState, Ticket), SessionError> {
        if self.is_calculating() {
            return Err(SessionError::Busy);
        }

        let ticket = Ticket { seq: self.next_seq };
        let next = UiState {
            in_flight: Some(ticket),
            view: View::Loading,
            last_request: Some(request),
            next_seq: self.next_seq + 1,
            ..self.clone()
        }
        .enable_results(true);

        Ok((next, ticket))
    }

    /// Applies the outcome of the request `ticket` was issued for.
    ///
    /// An outcome for any other ticket is stale and leaves the state as is.
    pub fn complete(&self, ticket: Ticket, outcome: Result<ScheduleResult, ClientError>) -> UiState {
        if self.in_flight != Some(ticket) {
            warn!("discarding stale response #{} (outstanding: {:?})", ticket.seq, self.in_flight);
            return self.clone();
        }

        match outcome {
            Ok(result) => {
                let location = self.last_request.as_ref().map_or(1, |r| r.location);
                let chart = match render::chart(&result, location) {
                    Ok(chart) => Some(chart),
                    Err(e) => {
                        error!("invalid chart data: {}", e);
                        self.chart.clone()
                    }
                };

                UiState {
                    in_flight: None,
                    view: View::Results { summary: render::summarize(&result) },
                    chart,
                    ..self.clone()
                }
            }
            Err(e) => {
                error!("optimization failed: {}", e);
                self.abandon(ticket)
            }
        }
    }

    /// Gives up on `ticket` without a result: the generic error is shown and
    /// the chart stays.
    pub fn abandon(&self, ticket: Ticket) -> UiState {
        if self.in_flight != Some(ticket) {
            return self.clone();
        }
        UiState {
            in_flight: None,
            view: View::Error { message: GENERIC_FAILURE_MESSAGE.to_string() },
            ..self.clone()
        }
    }
}
