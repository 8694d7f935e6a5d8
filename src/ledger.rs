//! Scenario Ledger - Append-only list of computed scenarios
//!
//! A submission only appends when its trigger count is ahead of the
//! ledger length, so re-fired or stale submissions leave it untouched.

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::scenario::{MetricMode, Scenario, ScenarioInput};
use crate::view::{ChartData, TableView};

/// Everything the page needs to redraw after a request
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LedgerView {
    pub mode: MetricMode,
    pub scenarios: Vec<Scenario>,
    pub table: TableView,
    pub chart: ChartData,
}

/// Result of a submission
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SubmitOutcome {
    /// Whether this call appended a new scenario
    pub appended: bool,
    #[serde(flatten)]
    pub view: LedgerView,
}

#[derive(Debug, Clone, Default)]
pub struct ScenarioLedger {
    mode: MetricMode,
    scenarios: Vec<Scenario>,
}

/// Ledger shared between request handlers. The lock is held across
/// the guard check and the append.
pub type SharedLedger = Arc<Mutex<ScenarioLedger>>;

impl ScenarioLedger {
    pub fn new(mode: MetricMode) -> Self {
        Self {
            mode,
            scenarios: Vec::new(),
        }
    }

    pub fn into_shared(self) -> SharedLedger {
        Arc::new(Mutex::new(self))
    }

    pub fn mode(&self) -> MetricMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    /// Append one scenario when `trigger_count` exceeds the current length,
    /// then return the full view either way.
    ///
    /// A count that jumps by more than one still appends a single entry.
    pub fn submit(&mut self, trigger_count: u64, input: &ScenarioInput) -> SubmitOutcome {
        let appended = trigger_count > self.scenarios.len() as u64;
        if appended {
            let scenario = Scenario::compute(self.scenarios.len(), input, self.mode);
            info!(
                "Appended {} (saving={:.0}, cost={:.0})",
                scenario.name, scenario.monthly_saving, scenario.monthly_cost
            );
            self.scenarios.push(scenario);
        } else {
            debug!(
                "Ignoring submission with trigger_count={} (ledger has {} entries)",
                trigger_count,
                self.scenarios.len()
            );
        }

        SubmitOutcome {
            appended,
            view: self.view(),
        }
    }

    /// Current table and chart for the whole ledger
    pub fn view(&self) -> LedgerView {
        LedgerView {
            mode: self.mode,
            scenarios: self.scenarios.clone(),
            table: TableView::build(self.mode, &self.scenarios),
            chart: ChartData::build(self.mode, &self.scenarios),
        }
    }
}
