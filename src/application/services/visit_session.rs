//! Real-time driver for one visitor's redirect flow.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior, interval_at, sleep_until};
use tracing::{debug, info, warn};

use crate::application::services::ReportService;
use crate::domain::redirect_flow::{
    AD_GRACE_PERIOD, FlowFailure, FlowSignal, FlowState, RedirectFlow,
};

const TICK: Duration = Duration::from_secs(1);

/// Input from the visitor's page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisitorSignal {
    Skip,
    AdViewed,
    /// Abuse report; handled on the side, the flow keeps going.
    Report { reason: String },
    /// Visitor navigated away.
    Leave,
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEnd {
    /// Reached the destination URL.
    Arrived(String),
    Failed(FlowFailure),
    /// Cancelled before reaching the destination. No transition happened
    /// after cancellation.
    Abandoned,
}

/// Runs a [`RedirectFlow`] against the clock.
///
/// Timed flows tick once per second; acknowledged ads wait
/// [`AD_GRACE_PERIOD`]. Dropping the signal sender ends the session like
/// [`VisitorSignal::Leave`]. Sessions share nothing with each other.
pub struct VisitSession {
    code: String,
    flow: RedirectFlow,
    reports: Option<ReportService>,
}

impl VisitSession {
    pub fn new(
        code: impl Into<String>,
        flow: RedirectFlow,
        reports: Option<ReportService>,
    ) -> Self {
        Self {
            code: code.into(),
            flow,
            reports,
        }
    }

    pub fn flow(&self) -> &RedirectFlow {
        &self.flow
    }

    pub async fn run(mut self, mut signals: mpsc::Receiver<VisitorSignal>) -> SessionEnd {
        let mut ticker = interval_at(Instant::now() + TICK, TICK);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut grace_deadline: Option<Instant> = None;

        loop {
            match self.flow.state() {
                FlowState::Destination => {
                    let destination = self.flow.destination().unwrap_or_default().to_string();
                    info!(
                        code = %self.code,
                        steps = self.flow.steps(),
                        "Visitor reached destination"
                    );
                    return SessionEnd::Arrived(destination);
                }
                FlowState::Error(failure) => return SessionEnd::Failed(*failure),
                _ => {}
            }

            let counting = matches!(self.flow.state(), FlowState::Timed { .. });
            let deadline = grace_deadline;

            tokio::select! {
                biased;

                signal = signals.recv() => match signal {
                    None | Some(VisitorSignal::Leave) => {
                        debug!(code = %self.code, state = self.flow.state().name(), "Visitor left");
                        return SessionEnd::Abandoned;
                    }
                    Some(VisitorSignal::Skip) => {
                        self.flow.apply(FlowSignal::Skip);
                    }
                    Some(VisitorSignal::AdViewed) => {
                        if self.flow.apply(FlowSignal::AdViewed) {
                            grace_deadline = Some(Instant::now() + AD_GRACE_PERIOD);
                        }
                    }
                    Some(VisitorSignal::Report { reason }) => self.forward_report(&reason),
                },

                _ = ticker.tick(), if counting => {
                    self.flow.apply(FlowSignal::Tick);
                }

                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    grace_deadline = None;
                    self.flow.apply(FlowSignal::GraceElapsed);
                }
            }
        }
    }

    fn forward_report(&self, reason: &str) {
        let Some(reports) = &self.reports else {
            debug!(code = %self.code, "No report collaborator, ignoring report");
            return;
        };

        if let Err(e) = reports.report_link(&self.code, reason) {
            warn!(code = %self.code, error = %e, "Rejected report from visitor");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Link, LinkStatus, RedirectType};
    use crate::domain::resolution::ResolutionOutcome;
    use chrono::Utc;
    use uuid::Uuid;

    const TARGET: &str = "https://example.com/target";

    fn flow(redirect_type: RedirectType) -> RedirectFlow {
        RedirectFlow::start(&ResolutionOutcome::Resolved(Link {
            id: Uuid::new_v4(),
            short_code: "abc123".to_string(),
            original_url: TARGET.to_string(),
            title: None,
            redirect_type,
            clicks: 1,
            status: LinkStatus::Active,
            owner: None,
            created_at: Utc::now(),
        }))
    }

    #[tokio::test(start_paused = true)]
    async fn test_direct_arrives_immediately() {
        let (_tx, rx) = mpsc::channel(4);
        let start = Instant::now();

        let end = VisitSession::new("abc123", flow(RedirectType::Direct), None)
            .run(rx)
            .await;

        assert_eq!(end, SessionEnd::Arrived(TARGET.to_string()));
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_arrives_after_five_seconds() {
        let (_tx, rx) = mpsc::channel(4);
        let start = Instant::now();

        let end = VisitSession::new("abc123", flow(RedirectType::Timer), None)
            .run(rx)
            .await;

        assert_eq!(end, SessionEnd::Arrived(TARGET.to_string()));
        assert_eq!(start.elapsed(), Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_abandoned_mid_countdown() {
        let (tx, rx) = mpsc::channel(4);
        let session = tokio::spawn(
            VisitSession::new("abc123", flow(RedirectType::Timer), None).run(rx),
        );

        tokio::time::sleep(Duration::from_millis(2500)).await;
        drop(tx);

        assert_eq!(session.await.unwrap(), SessionEnd::Abandoned);
    }

    #[tokio::test(start_paused = true)]
    async fn test_leave_signal_cancels() {
        let (tx, rx) = mpsc::channel(4);
        let session = tokio::spawn(
            VisitSession::new("abc123", flow(RedirectType::Ad), None).run(rx),
        );

        tx.send(VisitorSignal::Leave).await.unwrap();

        assert_eq!(session.await.unwrap(), SessionEnd::Abandoned);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_skip() {
        let (tx, rx) = mpsc::channel(4);
        let start = Instant::now();
        let session = tokio::spawn(
            VisitSession::new("abc123", flow(RedirectType::Timer), None).run(rx),
        );

        tokio::time::sleep(Duration::from_millis(1500)).await;
        tx.send(VisitorSignal::Skip).await.unwrap();

        assert_eq!(
            session.await.unwrap(),
            SessionEnd::Arrived(TARGET.to_string())
        );
        assert!(start.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_ad_viewed_waits_grace_period() {
        let (tx, rx) = mpsc::channel(4);
        let start = Instant::now();
        let session = tokio::spawn(
            VisitSession::new("abc123", flow(RedirectType::Ad), None).run(rx),
        );

        tx.send(VisitorSignal::AdViewed).await.unwrap();

        assert_eq!(
            session.await.unwrap(),
            SessionEnd::Arrived(TARGET.to_string())
        );
        assert_eq!(start.elapsed(), AD_GRACE_PERIOD);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ad_skip_is_immediate() {
        let (tx, rx) = mpsc::channel(4);
        let start = Instant::now();

        tx.send(VisitorSignal::Skip).await.unwrap();
        let end = VisitSession::new("abc123", flow(RedirectType::Ad), None)
            .run(rx)
            .await;

        assert_eq!(end, SessionEnd::Arrived(TARGET.to_string()));
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_report_does_not_disturb_countdown() {
        let (report_tx, mut report_rx) = mpsc::channel(4);
        let reports = ReportService::new(report_tx);

        let (tx, rx) = mpsc::channel(4);
        let start = Instant::now();

        tx.send(VisitorSignal::Report {
            reason: "phishing".to_string(),
        })
        .await
        .unwrap();

        let end = VisitSession::new("abc123", flow(RedirectType::Timer), Some(reports))
            .run(rx)
            .await;

        assert_eq!(end, SessionEnd::Arrived(TARGET.to_string()));
        assert_eq!(start.elapsed(), Duration::from_secs(5));

        let event = report_rx.try_recv().unwrap();
        assert_eq!(event.code, "abc123");
        assert_eq!(event.reason, "phishing");
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_flow_ends_immediately() {
        let (_tx, rx) = mpsc::channel(4);

        let end = VisitSession::new("abc123", RedirectFlow::aborted(), None)
            .run(rx)
            .await;

        assert_eq!(end, SessionEnd::Failed(FlowFailure::Transient));
    }
}
