//! Navigation session state machine
//!
//! `Idle` until a route is set, then `Routed` with a step cursor that
//! saturates at both ends. Concurrent navigate requests are ordered by
//! [`RequestToken`]: only the route for the most recently issued token is
//! applied, so a slow earlier response cannot overwrite a newer one.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{Error, RouteInfo, RouteStep};

/// Monotonically increasing ticket for one navigate request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum SessionState {
    #[default]
    Idle,
    Routed {
        route: RouteInfo,
        current_step_index: usize,
    },
}

/// What remains of the active route from the current step on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    /// 1-based position of the current step
    pub step_number: usize,
    pub step_count: usize,
    pub remaining_distance_meters: f64,
    pub remaining_duration_seconds: f64,
}

/// Serializable snapshot of a session for the UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionView {
    pub routed: bool,
    pub current_step_index: usize,
    pub current_step: Option<RouteStep>,
    pub progress: Option<Progress>,
    pub route: Option<RouteInfo>,
}

#[derive(Debug, Default)]
pub struct NavigationSession {
    state: SessionState,
    latest_token: u64,
}

impl NavigationSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn route(&self) -> Option<&RouteInfo> {
        match &self.state {
            SessionState::Idle => None,
            SessionState::Routed { route, .. } => Some(route),
        }
    }

    /// Index of the current step; 0 while idle
    pub fn current_step_index(&self) -> usize {
        match &self.state {
            SessionState::Idle => 0,
            SessionState::Routed {
                current_step_index, ..
            } => *current_step_index,
        }
    }

    pub fn current_step(&self) -> Option<&RouteStep> {
        match &self.state {
            SessionState::Idle => None,
            SessionState::Routed {
                route,
                current_step_index,
            } => route.steps.get(*current_step_index),
        }
    }

    /// Replaces the route wholesale and rewinds to the first step
    pub fn set_route(&mut self, route: RouteInfo) {
        debug!(
            "Session routed: {} steps, {:.0} m",
            route.steps.len(),
            route.total_distance_meters
        );
        self.state = SessionState::Routed {
            route,
            current_step_index: 0,
        };
    }

    /// Drops the route and invalidates any navigate request still in flight
    pub fn clear(&mut self) {
        self.state = SessionState::Idle;
        self.latest_token += 1;
    }

    /// Moves to the next step, staying on the last one
    pub fn advance(&mut self) -> usize {
        if let SessionState::Routed {
            route,
            current_step_index,
        } = &mut self.state
            && *current_step_index + 1 < route.steps.len()
        {
            *current_step_index += 1;
        }
        self.current_step_index()
    }

    /// Moves to the previous step, staying on the first one
    pub fn retreat(&mut self) -> usize {
        if let SessionState::Routed {
            current_step_index, ..
        } = &mut self.state
            && *current_step_index > 0
        {
            *current_step_index -= 1;
        }
        self.current_step_index()
    }

    /// Issues the token for a new navigate request, superseding all earlier ones
    pub fn begin_request(&mut self) -> RequestToken {
        self.latest_token += 1;
        RequestToken(self.latest_token)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.latest_token
    }

    /// Applies the route computed for `token` if no newer request was issued.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Superseded`] and leaves the session untouched when a
    /// newer request has been issued since `token`.
    pub fn apply_route(&mut self, token: RequestToken, route: RouteInfo) -> Result<(), Error> {
        if !self.is_current(token) {
            info!(
                "Discarding route for request {} (latest is {})",
                token.0, self.latest_token
            );
            return Err(Error::Superseded(token.0));
        }
        self.set_route(route);
        Ok(())
    }

    pub fn progress(&self) -> Option<Progress> {
        let SessionState::Routed {
            route,
            current_step_index,
        } = &self.state
        else {
            return None;
        };
        if route.steps.is_empty() {
            return None;
        }
        let remaining = &route.steps[*current_step_index..];
        Some(Progress {
            step_number: current_step_index + 1,
            step_count: route.steps.len(),
            remaining_distance_meters: remaining.iter().map(|s| s.distance_meters).sum(),
            remaining_duration_seconds: remaining.iter().map(|s| s.duration_seconds).sum(),
        })
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            routed: self.route().is_some(),
            current_step_index: self.current_step_index(),
            current_step: self.current_step().cloned(),
            progress: self.progress(),
            route: self.route().cloned(),
        }
    }
}
