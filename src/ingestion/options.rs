use std::fmt;
use std::sync::Arc;

use crate::error::IngestionError;

use super::observability::{
    severity_for_error, IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats, IngestionWarning,
};

/// Options shared by every ingestor and by [`crate::pipeline::run`].
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct IngestionOptions {
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn IngestionObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: IngestionSeverity,
    /// Abort a pipeline run on the first top-level file failure instead of recording it.
    pub fail_fast: bool,
}

impl fmt::Debug for IngestionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionOptions")
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .field("fail_fast", &self.fail_fast)
            .finish()
    }
}

impl Default for IngestionOptions {
    fn default() -> Self {
        Self {
            observer: None,
            alert_at_or_above: IngestionSeverity::Critical,
            fail_fast: false,
        }
    }
}

impl IngestionOptions {
    pub(crate) fn report_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        if let Some(obs) = self.observer.as_ref() {
            obs.on_success(ctx, stats);
        }
    }

    /// Reports `on_failure`, then `on_alert` when the severity meets the threshold.
    pub(crate) fn report_failure(&self, ctx: &IngestionContext, error: &IngestionError) -> IngestionSeverity {
        let sev = severity_for_error(error);
        if let Some(obs) = self.observer.as_ref() {
            obs.on_failure(ctx, sev, error);
            if sev >= self.alert_at_or_above {
                obs.on_alert(ctx, sev, error);
            }
        }
        sev
    }

    pub(crate) fn report_warning(&self, warning: &IngestionWarning) {
        if let Some(obs) = self.observer.as_ref() {
            obs.on_warning(warning);
        }
    }
}
