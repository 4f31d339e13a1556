//! Redirect state machine driving a visitor from a resolved code to its
//! destination.
//!
//! ```text
//!            ┌── direct ─────────────────────────────┐
//!   Start ───┼── timer ──> Timed{5} ─tick..tick/skip─┼──> Destination
//!            └── ad ─────> AdGate ─skip / viewed+1s──┘
//!     │
//!     └── not found / unavailable / transient ──> Error
//! ```
//!
//! The machine is pure: it consumes [`FlowSignal`]s and never sleeps.
//! Wall-clock timing (one tick per second, the ad grace period) is the job of
//! [`crate::application::services::VisitSession`]. Abuse reports are a side
//! channel and never reach the machine.

use std::time::Duration;

use crate::domain::entities::RedirectType;
use crate::domain::resolution::ResolutionOutcome;

/// Countdown a timed interstitial starts from, in one-second ticks.
pub const COUNTDOWN_SECONDS: u32 = 5;

/// Delay between "ad viewed" and the redirect.
pub const AD_GRACE_PERIOD: Duration = Duration::from_secs(1);

/// Why a flow ended in [`FlowState::Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowFailure {
    NotFound,
    Unavailable,
    Transient,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowState {
    Start,
    /// Countdown page; `remaining` ticks until the redirect.
    Timed { remaining: u32 },
    /// Ad interstitial; `acknowledged` once the visitor marked it viewed and
    /// the grace period is running.
    AdGate { acknowledged: bool },
    Destination,
    Error(FlowFailure),
}

impl FlowState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Destination | Self::Error(_))
    }

    /// Short name used in logs and JSON payloads.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Timed { .. } => "timed",
            Self::AdGate { .. } => "ad_gate",
            Self::Destination => "destination",
            Self::Error(_) => "error",
        }
    }
}

/// Inputs the machine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowSignal {
    /// One second elapsed on a countdown.
    Tick,
    /// Visitor asked to go now.
    Skip,
    /// Visitor acknowledged the ad.
    AdViewed,
    /// The ad grace period ran out.
    GraceElapsed,
}

/// One visitor's walk through the redirect states.
#[derive(Debug, Clone)]
pub struct RedirectFlow {
    state: FlowState,
    destination: Option<String>,
    redirect_type: Option<RedirectType>,
    steps: u32,
}

impl RedirectFlow {
    /// Leaves `Start` according to the resolution outcome.
    ///
    /// Direct links land on `Destination` right away with zero interstitial
    /// steps.
    pub fn start(outcome: &ResolutionOutcome) -> Self {
        let mut flow = Self {
            state: FlowState::Start,
            destination: None,
            redirect_type: None,
            steps: 0,
        };

        flow.state = match outcome {
            ResolutionOutcome::Resolved(link) => {
                flow.destination = Some(link.original_url.clone());
                flow.redirect_type = Some(link.redirect_type);
                match link.redirect_type {
                    RedirectType::Direct => FlowState::Destination,
                    RedirectType::Timer => FlowState::Timed {
                        remaining: COUNTDOWN_SECONDS,
                    },
                    RedirectType::Ad => FlowState::AdGate {
                        acknowledged: false,
                    },
                }
            }
            ResolutionOutcome::NotFound => FlowState::Error(FlowFailure::NotFound),
            ResolutionOutcome::Unavailable { .. } => FlowState::Error(FlowFailure::Unavailable),
        };

        flow
    }

    /// A flow whose resolution failed with a storage error.
    pub fn aborted() -> Self {
        Self {
            state: FlowState::Error(FlowFailure::Transient),
            destination: None,
            redirect_type: None,
            steps: 0,
        }
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn redirect_type(&self) -> Option<RedirectType> {
        self.redirect_type
    }

    /// The URL the flow leads to, once it got there.
    pub fn destination(&self) -> Option<&str> {
        match self.state {
            FlowState::Destination => self.destination.as_deref(),
            _ => None,
        }
    }

    /// The URL the flow will lead to, for rendering interstitials.
    pub fn pending_destination(&self) -> Option<&str> {
        self.destination.as_deref()
    }

    /// Number of signals that changed state.
    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Feeds one signal. Returns true if the state changed.
    ///
    /// Signals that do not apply to the current state are ignored, so a late
    /// tick or a double skip is harmless. Terminal states ignore everything.
    pub fn apply(&mut self, signal: FlowSignal) -> bool {
        let next = match (&self.state, signal) {
            (FlowState::Timed { remaining }, FlowSignal::Tick) if *remaining <= 1 => {
                FlowState::Destination
            }
            (FlowState::Timed { remaining }, FlowSignal::Tick) => FlowState::Timed {
                remaining: remaining - 1,
            },
            (FlowState::Timed { .. }, FlowSignal::Skip) => FlowState::Destination,
            (
                FlowState::AdGate {
                    acknowledged: false,
                },
                FlowSignal::Skip,
            ) => FlowState::Destination,
            (
                FlowState::AdGate {
                    acknowledged: false,
                },
                FlowSignal::AdViewed,
            ) => FlowState::AdGate { acknowledged: true },
            (FlowState::AdGate { acknowledged: true }, FlowSignal::GraceElapsed) => {
                FlowState::Destination
            }
            _ => return false,
        };

        self.state = next;
        self.steps += 1;
        true
    }
}
