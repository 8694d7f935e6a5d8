//! Scenario - Cost evaluation of a single RFID deployment
//!
//! Turns one submitted set of cost parameters into a derived record.
//! The metric mode decides whether the record carries a 24-month
//! cumulative cash-flow projection or a simple ROI figure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DashboardError;

/// Projection horizon of the cash-flow mode, in months.
pub const HORIZON_MONTHS: usize = 24;

/// Which derived metrics a ledger produces
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum MetricMode {
    /// Cumulative cash-flow line chart over the projection horizon
    #[default]
    #[serde(rename = "cashflow")]
    CashFlow,
    /// ROI bar chart, one bar per scenario
    #[serde(rename = "roi")]
    Roi,
}

impl MetricMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricMode::CashFlow => "cashflow",
            MetricMode::Roi => "roi",
        }
    }
}

impl fmt::Display for MetricMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricMode {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cashflow" | "cash-flow" | "cash_flow" => Ok(MetricMode::CashFlow),
            "roi" => Ok(MetricMode::Roi),
            other => Err(DashboardError::InvalidMode(other.to_string())),
        }
    }
}

/// Parameters supplied by the input form on each submission.
///
/// Values are trusted as-is: negative or zero inputs flow straight
/// through the formulas.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ScenarioInput {
    /// RFID tag unit cost (JPY)
    pub tag_cost: f64,
    /// Labor cost (JPY per hour)
    pub labor_cost: f64,
    /// Hours per task before deployment
    pub time_before: f64,
    /// Hours per task after deployment
    pub time_after: f64,
    /// Tasks per month
    pub task_count: f64,
    /// Tags consumed per task
    pub tags_per_task: f64,
    /// One-time setup cost (JPY)
    pub setup_cost: f64,
    /// Monthly maintenance cost (JPY)
    pub maintenance_cost: f64,
}

impl Default for ScenarioInput {
    fn default() -> Self {
        Self {
            tag_cost: 50.0,
            labor_cost: 1500.0,
            time_before: 1.0,
            time_after: 0.5,
            task_count: 100.0,
            tags_per_task: 10.0,
            setup_cost: 100_000.0,
            maintenance_cost: 5000.0,
        }
    }
}

impl ScenarioInput {
    pub fn labor_cost_before(&self) -> f64 {
        self.labor_cost * self.time_before * self.task_count
    }

    pub fn labor_cost_after(&self) -> f64 {
        self.labor_cost * self.time_after * self.task_count
    }

    pub fn tag_total_cost(&self) -> f64 {
        self.tag_cost * self.tags_per_task * self.task_count
    }

    /// Labor cost saved per month
    pub fn monthly_saving(&self) -> f64 {
        self.labor_cost_before() - self.labor_cost_after()
    }

    /// Recurring cost per month: maintenance plus consumed tags
    pub fn monthly_cost(&self) -> f64 {
        self.maintenance_cost + self.tag_total_cost()
    }

    /// Running cash position at the end of each month `1..=HORIZON_MONTHS`.
    pub fn cumulative_cashflow(&self) -> Vec<f64> {
        let net = self.monthly_saving() - self.monthly_cost();
        (1..=HORIZON_MONTHS)
            .map(|month| -self.setup_cost + month as f64 * net)
            .collect()
    }

    /// Simple ROI in percent. A non-positive cost base yields 0.
    pub fn roi(&self) -> f64 {
        let cost_base = self.setup_cost + self.maintenance_cost + self.tag_total_cost();
        if cost_base <= 0.0 {
            return 0.0;
        }
        (self.monthly_saving() - cost_base) / cost_base * 100.0
    }

    pub fn total_cost(&self) -> f64 {
        self.setup_cost + self.maintenance_cost + self.labor_cost_after() + self.tag_total_cost()
    }
}

/// Mode-specific part of a scenario
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "mode")]
pub enum ScenarioMetrics {
    #[serde(rename = "cashflow")]
    CashFlow {
        initial_investment: f64,
        cumulative_cashflow: Vec<f64>,
    },
    #[serde(rename = "roi")]
    Roi { roi: f64, total_cost: f64 },
}

/// A computed scenario as stored in the ledger
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Scenario {
    pub name: String,
    pub monthly_saving: f64,
    pub monthly_cost: f64,
    pub labor_cost_before: f64,
    pub labor_cost_after: f64,
    pub tag_total_cost: f64,
    #[serde(flatten)]
    pub metrics: ScenarioMetrics,
    pub created_at: DateTime<Utc>,
}

impl Scenario {
    /// Build the scenario that will sit at zero-based `position` in a ledger.
    pub fn compute(position: usize, input: &ScenarioInput, mode: MetricMode) -> Self {
        let metrics = match mode {
            MetricMode::CashFlow => ScenarioMetrics::CashFlow {
                initial_investment: input.setup_cost,
                cumulative_cashflow: input.cumulative_cashflow(),
            },
            MetricMode::Roi => ScenarioMetrics::Roi {
                roi: input.roi(),
                total_cost: input.total_cost(),
            },
        };

        Self {
            name: format!("Scenario {}", position + 1),
            monthly_saving: input.monthly_saving(),
            monthly_cost: input.monthly_cost(),
            labor_cost_before: input.labor_cost_before(),
            labor_cost_after: input.labor_cost_after(),
            tag_total_cost: input.tag_total_cost(),
            metrics,
            created_at: Utc::now(),
        }
    }

    pub fn mode(&self) -> MetricMode {
        match self.metrics {
            ScenarioMetrics::CashFlow { .. } => MetricMode::CashFlow,
            ScenarioMetrics::Roi { .. } => MetricMode::Roi,
        }
    }

    pub fn cumulative_cashflow(&self) -> Option<&[f64]> {
        match &self.metrics {
            ScenarioMetrics::CashFlow { cumulative_cashflow, .. } => Some(cumulative_cashflow),
            ScenarioMetrics::Roi { .. } => None,
        }
    }

    pub fn roi(&self) -> Option<f64> {
        match self.metrics {
            ScenarioMetrics::Roi { roi, .. } => Some(roi),
            ScenarioMetrics::CashFlow { .. } => None,
        }
    }
}
