use tracing::{info, warn};

use crate::scoring::classify::RiskLevel;
use crate::SubjectKind;

/// Events emitted after a computation has been persisted.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    ScoreComputed {
        kind: SubjectKind,
        subject_id: i64,
        overall: u8,
        version: i32,
    },
    RiskAssessed {
        kind: SubjectKind,
        subject_id: i64,
        level: RiskLevel,
        score: f64,
    },
    MatchesRanked {
        investor_id: i64,
        ranked: usize,
    },
}

/// Outbound notification/audit boundary.
///
/// Implementations are best-effort: they swallow their own failures and must
/// not block the caller, so a dead webhook can never fail or roll back a
/// scoring computation. Long-running sinks spawn internally.
pub trait Notifier: Send + Sync {
    fn notify(&self, event: &Notification);
}

/// Default sink: structured audit records in the service log. Elevated risk
/// gets a warning so alerting can key on it.
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, event: &Notification) {
        match event {
            Notification::ScoreComputed {
                kind,
                subject_id,
                overall,
                version,
            } => {
                info!(%kind, subject_id, overall, version, "score profile persisted");
            }
            Notification::RiskAssessed {
                kind,
                subject_id,
                level,
                score,
            } => {
                if level.requires_manual_review() {
                    warn!(%kind, subject_id, %level, score, "risk threshold crossed");
                } else {
                    info!(%kind, subject_id, %level, score, "risk assessment persisted");
                }
            }
            Notification::MatchesRanked { investor_id, ranked } => {
                info!(investor_id, ranked, "compatibility matches persisted");
            }
        }
    }
}
