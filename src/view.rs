//! Rendering views derived from a ledger snapshot
//!
//! The table and chart shapes depend on the ledger's metric mode. Chart
//! data is emitted as plotly-style traces so the page can hand it to the
//! charting library unchanged.

use serde::Serialize;

use crate::scenario::{MetricMode, Scenario, ScenarioMetrics, HORIZON_MONTHS};

/// Tabular rendering of all ledger entries
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TableView {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableView {
    pub fn build(mode: MetricMode, scenarios: &[Scenario]) -> Self {
        let columns: &[&str] = match mode {
            MetricMode::CashFlow => &[
                "Scenario",
                "Monthly saving (JPY)",
                "Monthly cost (JPY)",
                "Initial investment (JPY)",
            ],
            MetricMode::Roi => &[
                "Scenario",
                "Monthly saving (JPY)",
                "Monthly cost (JPY)",
                "ROI (%)",
                "Total cost (JPY)",
            ],
        };

        let rows = scenarios
            .iter()
            .map(|s| {
                let mut row = vec![
                    s.name.clone(),
                    format!("{:.0}", s.monthly_saving),
                    format!("{:.0}", s.monthly_cost),
                ];
                match &s.metrics {
                    ScenarioMetrics::CashFlow { initial_investment, .. } => {
                        row.push(format!("{:.0}", initial_investment));
                    }
                    ScenarioMetrics::Roi { roi, total_cost } => {
                        row.push(format!("{:.2}", roi));
                        row.push(format!("{:.0}", total_cost));
                    }
                }
                row
            })
            .collect();

        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
        }
    }

    /// Render as an HTML `<table>`, escaping every cell.
    pub fn to_html(&self) -> String {
        let mut html = String::from("<table class=\"scenario-table\"><thead><tr>");
        for column in &self.columns {
            html.push_str(&format!("<th>{}</th>", html_escape::encode_text(column)));
        }
        html.push_str("</tr></thead><tbody>");
        for row in &self.rows {
            html.push_str("<tr>");
            for cell in row {
                html.push_str(&format!("<td>{}</td>", html_escape::encode_text(cell)));
            }
            html.push_str("</tr>");
        }
        html.push_str("</tbody></table>");
        html
    }
}

/// X values of a trace: month numbers for line charts, labels for bars
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum TraceAxis {
    Months(Vec<u32>),
    Labels(Vec<String>),
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Trace {
    #[serde(rename = "type")]
    pub trace_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<&'static str>,
    pub name: String,
    pub x: TraceAxis,
    pub y: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChartLayout {
    pub title: &'static str,
    pub x_title: &'static str,
    pub y_title: &'static str,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChartData {
    pub traces: Vec<Trace>,
    pub layout: ChartLayout,
}

impl ChartData {
    pub fn build(mode: MetricMode, scenarios: &[Scenario]) -> Self {
        match mode {
            MetricMode::CashFlow => Self::cashflow(scenarios),
            MetricMode::Roi => Self::roi(scenarios),
        }
    }

    /// One line per scenario over months 1..=24
    fn cashflow(scenarios: &[Scenario]) -> Self {
        let months: Vec<u32> = (1..=HORIZON_MONTHS as u32).collect();
        let traces = scenarios
            .iter()
            .filter_map(|s| {
                s.cumulative_cashflow().map(|flow| Trace {
                    trace_type: "scatter",
                    mode: Some("lines+markers"),
                    name: s.name.clone(),
                    x: TraceAxis::Months(months.clone()),
                    y: flow.to_vec(),
                })
            })
            .collect();

        Self {
            traces,
            layout: ChartLayout {
                title: "Cumulative cash flow (24 months)",
                x_title: "Month",
                y_title: "Cumulative cash flow (JPY)",
            },
        }
    }

    /// A single bar series, one bar per scenario in ledger order
    fn roi(scenarios: &[Scenario]) -> Self {
        let (names, values): (Vec<String>, Vec<f64>) = scenarios
            .iter()
            .filter_map(|s| s.roi().map(|roi| (s.name.clone(), roi)))
            .unzip();

        Self {
            traces: vec![Trace {
                trace_type: "bar",
                mode: None,
                name: "ROI".to_string(),
                x: TraceAxis::Labels(names),
                y: values,
            }],
            layout: ChartLayout {
                title: "ROI by scenario",
                x_title: "Scenario",
                y_title: "ROI (%)",
            },
        }
    }
}
