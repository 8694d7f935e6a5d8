//! Dashboard page
//!
//! Server-renders the form and the current table, and embeds the chart
//! data so a reloaded session shows its scenarios immediately. Each click
//! posts the form together with the page's click counter.

use anyhow::{Context, Result};

use crate::ledger::LedgerView;
use crate::scenario::{MetricMode, ScenarioInput};
use crate::session::SessionId;

/// Form fields in display order: (id, label, default)
fn form_fields(input: &ScenarioInput) -> [(&'static str, &'static str, f64); 8] {
    [
        ("tag_cost", "RFID tag unit cost (JPY)", input.tag_cost),
        ("labor_cost", "Labor cost (JPY/hour)", input.labor_cost),
        ("time_before", "Hours per task before", input.time_before),
        ("time_after", "Hours per task after", input.time_after),
        ("task_count", "Tasks per month", input.task_count),
        ("tags_per_task", "Tags per task", input.tags_per_task),
        ("setup_cost", "Setup cost (JPY)", input.setup_cost),
        ("maintenance_cost", "Monthly maintenance (JPY)", input.maintenance_cost),
    ]
}

fn render_form() -> String {
    form_fields(&ScenarioInput::default())
        .iter()
        .map(|(id, label, value)| {
            format!(
                "<label for=\"{id}\">{label}</label>\n            <input id=\"{id}\" type=\"number\" step=\"any\" value=\"{value}\">",
                id = id,
                label = html_escape::encode_text(label),
                value = value,
            )
        })
        .collect::<Vec<_>>()
        .join("\n            ")
}

/// JSON that is safe to inline inside a `<script>` element
fn script_json<T: serde::Serialize>(value: &T) -> Result<String> {
    let json = serde_json::to_string(value).context("Failed to serialize chart data")?;
    Ok(json.replace("</", "<\\/"))
}

pub fn render(id: SessionId, view: &LedgerView, clicks: usize, start_local: &str) -> Result<String> {
    let heading = match view.mode {
        MetricMode::CashFlow => "RFID ROI Simulator (cumulative cash flow)",
        MetricMode::Roi => "RFID ROI Simulator",
    };
    let chart_json = script_json(&view.chart)?;
    let field_ids = script_json(
        &form_fields(&ScenarioInput::default())
            .iter()
            .map(|(id, _, _)| *id)
            .collect::<Vec<_>>(),
    )?;

    // NOTE: double braces are literal braces for format!
    Ok(format!(r####"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{heading}</title>
    <script src="https://cdn.plot.ly/plotly-2.35.2.min.js"></script>
    <style>
        body {{ font-family: -apple-system, BlinkMacSystemFont, sans-serif; margin: 0 20px; color: #222; }}
        h1 {{ text-align: center; }}
        header {{ display: flex; justify-content: space-between; font-size: 11px; color: #888; padding: 6px 0; border-bottom: 1px solid #eee; }}
        .inputs {{ width: 30%; display: inline-block; vertical-align: top; padding: 10px; box-sizing: border-box; }}
        .inputs label {{ display: block; margin-top: 8px; font-size: 13px; }}
        .inputs input {{ width: 100%; }}
        .inputs button {{ margin-top: 10px; }}
        #scenario_list {{ width: 65%; display: inline-block; padding: 10px; box-sizing: border-box; }}
        .scenario-table {{ border-collapse: collapse; width: 100%; }}
        .scenario-table th, .scenario-table td {{ border: 1px solid #ccc; padding: 6px; text-align: right; }}
        .scenario-table th:first-child, .scenario-table td:first-child {{ text-align: left; }}
        #error {{ color: #c00; font-size: 12px; }}
    </style>
</head>
<body>
    <header><span>SESSION {id}</span><span>MODE {mode}</span><span>SINCE {start_local}</span></header>
    <h1>{heading}</h1>

    <div>
        <div class="inputs">
            <h3>Scenario input</h3>
            {form}
            <button id="add_scenario" onclick="addScenario()">Add scenario</button>
            <div id="error"></div>
        </div>
        <div id="scenario_list">{table}</div>
    </div>

    <div id="chart"></div>

    <script>
        const sessionId = "{id}";
        const fieldIds = {field_ids};
        let clicks = {clicks};

        function drawChart(chart) {{
            const layout = {{
                title: {{ text: chart.layout.title }},
                xaxis: {{ title: {{ text: chart.layout.x_title }} }},
                yaxis: {{ title: {{ text: chart.layout.y_title }} }}
            }};
            Plotly.react('chart', chart.traces, layout);
        }}

        function drawTable(table) {{
            const el = document.createElement('table');
            el.className = 'scenario-table';
            const head = el.createTHead().insertRow();
            table.columns.forEach(c => {{ const th = document.createElement('th'); th.textContent = c; head.appendChild(th); }});
            const body = el.createTBody();
            table.rows.forEach(r => {{ const tr = body.insertRow(); r.forEach(v => {{ tr.insertCell().textContent = v; }}); }});
            const list = document.getElementById('scenario_list');
            list.replaceChildren(el);
        }}

        async function addScenario() {{
            clicks += 1;
            const input = {{}};
            fieldIds.forEach(f => {{ input[f] = parseFloat(document.getElementById(f).value); }});
            const res = await fetch('/api/sessions/' + sessionId + '/scenarios', {{
                method: 'POST',
                headers: {{ 'Content-Type': 'application/json' }},
                body: JSON.stringify({{ trigger_count: clicks, input: input }})
            }});
            const errorBox = document.getElementById('error');
            if (!res.ok) {{
                errorBox.textContent = 'Submission rejected (' + res.status + ')';
                return;
            }}
            errorBox.textContent = '';
            const view = await res.json();
            drawTable(view.table);
            drawChart(view.chart);
        }}

        drawChart({chart_json});
    </script>
</body>
</html>"####,
        heading = heading,
        id = id,
        mode = view.mode,
        start_local = html_escape::encode_text(start_local),
        form = render_form(),
        table = view.table.to_html(),
        field_ids = field_ids,
        clicks = clicks,
        chart_json = chart_json,
    ))
}
