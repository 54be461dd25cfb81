//! HTML status page.
//!
//! The page shows instantaneous readings as cards and charts the sample
//! history client-side by fetching `/api/history`.

use std::fmt::Write;

use hostwatch_types::Overview;

/// Placeholder shown for a metric that could not be read.
pub const PLACEHOLDER: &str = "—";

/// Periods offered by the chart selector, in seconds.
const PERIOD_CHOICES: &[(i64, &str)] = &[
    (3_600, "Last 1 hour"),
    (21_600, "Last 6 hours"),
    (86_400, "Last 24 hours"),
];

/// Presentation settings for the status page.
#[derive(Debug, Clone)]
pub struct PageOptions {
    /// Heading and document title.
    pub title: String,
    /// Seconds between automatic page reloads.
    pub refresh_secs: u64,
    /// Sampling cadence, shown in the footer.
    pub cadence_secs: u64,
    /// Period the chart loads initially.
    pub default_period_secs: i64,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            title: "hostwatch".to_string(),
            refresh_secs: 10,
            cadence_secs: 30,
            default_period_secs: crate::history::DEFAULT_PERIOD_SECS,
        }
    }
}

const STYLE: &str = r#"    * { box-sizing: border-box; }
    body { font-family: system-ui,sans-serif; margin: 0; padding: 1rem; background: #0d1117; color: #e6edf3; }
    h1 { font-size: 1.1rem; margin: 0 0 1rem; }
    .grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(140px, 1fr)); gap: 0.75rem; max-width: 640px; }
    .card { background: #161b22; border: 1px solid #30363d; border-radius: 8px; padding: 1rem; }
    .card h2 { font-size: 0.7rem; text-transform: uppercase; letter-spacing: .05em; color: #8b949e; margin: 0 0 0.5rem; }
    .card .val { font-size: 1.4rem; font-weight: 600; }
    .card .sub { font-size: 0.75rem; color: #8b949e; margin-top: 0.25rem; }
    .charts { margin-top: 1.5rem; max-width: 900px; }
    .chart-box { background: #161b22; border: 1px solid #30363d; border-radius: 8px; padding: 1rem; margin-bottom: 1rem; }
    .chart-box h2 { font-size: 0.85rem; margin: 0 0 0.5rem; color: #8b949e; }
    .period { margin-bottom: 0.5rem; }
    .period select { background: #21262d; color: #e6edf3; border: 1px solid #30363d; padding: 0.25rem 0.5rem; border-radius: 4px; }
    .foot { margin-top: 1rem; font-size: 0.75rem; color: #8b949e; }
"#;

const CHART_SCRIPT: &str = r#"    const ctx = document.getElementById('chart').getContext('2d');
    let chart = null;
    function fmtTime(ts) { return new Date(ts * 1000).toLocaleTimeString([], { hour: '2-digit', minute: '2-digit' }); }
    function loadHistory(period) {
      fetch('/api/history?period=' + period).then(r => r.json()).then(data => {
        const labels = (data.labels || []).map(fmtTime);
        const datasets = [
          { label: 'CPU %', data: data.cpu || [], borderColor: '#58a6ff', tension: 0.2, fill: false },
          { label: 'RAM %', data: data.mem || [], borderColor: '#3fb950', tension: 0.2, fill: false },
          { label: 'Disk %', data: data.disk || [], borderColor: '#d29922', tension: 0.2, fill: false },
          { label: 'Load 1m', data: data.load || [], borderColor: '#bc8cff', tension: 0.2, fill: false, yAxisID: 'y1' }
        ];
        if (chart) chart.destroy();
        chart = new Chart(ctx, {
          type: 'line',
          data: { labels, datasets },
          options: {
            responsive: true,
            plugins: { legend: { position: 'top' } },
            scales: {
              y: { min: 0, max: 100, title: { display: true, text: '%' } },
              y1: { position: 'right', min: 0, grid: { drawOnChartArea: false }, title: { display: true, text: 'Load' } }
            }
          }
        });
      });
    }
    document.getElementById('period').addEventListener('change', function() { loadHistory(this.value); });
"#;

/// Render the status page for one set of readings.
pub fn render_status_page(overview: &Overview, options: &PageOptions) -> String {
    let title = escape_html(&options.title);
    let memory = overview.memory.as_ref();
    let disk = overview.disk.as_ref();

    let mut page = String::with_capacity(8 * 1024);

    page.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    page.push_str("  <meta charset=\"utf-8\">\n");
    page.push_str(
        "  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n",
    );
    let _ = writeln!(page, "  <title>{} overview</title>", title);
    page.push_str(
        "  <script src=\"https://cdn.jsdelivr.net/npm/chart.js@4.4.1/dist/chart.umd.min.js\"></script>\n",
    );
    page.push_str("  <style>\n");
    page.push_str(STYLE);
    page.push_str("  </style>\n");
    let _ = writeln!(
        page,
        "  <meta http-equiv=\"refresh\" content=\"{}\">",
        options.refresh_secs
    );
    page.push_str("</head>\n<body>\n");
    let _ = writeln!(page, "  <h1>{}</h1>", title);

    // Cards
    page.push_str("  <div class=\"grid\">\n");
    push_card(&mut page, "CPU", &format!("{}%", one_decimal(overview.cpu_percent)), None);
    push_card(
        &mut page,
        "Load (1m)",
        &plain(overview.load.map(|l| l.one)),
        None,
    );
    push_card(
        &mut page,
        "RAM",
        &format!("{}%", one_decimal(memory.map(|m| m.percent))),
        Some(&format!(
            "{} / {} MiB",
            one_decimal(memory.map(|m| m.used_mib)),
            one_decimal(memory.map(|m| m.total_mib))
        )),
    );
    push_card(
        &mut page,
        "Disk /",
        &format!("{}%", one_decimal(disk.map(|d| d.percent))),
        Some(&format!(
            "{} / {} GiB",
            one_decimal(disk.map(|d| d.used_gib)),
            one_decimal(disk.map(|d| d.total_gib))
        )),
    );
    push_card(
        &mut page,
        "Uptime",
        &escape_html(overview.uptime.as_deref().unwrap_or(PLACEHOLDER)),
        None,
    );
    page.push_str("  </div>\n");

    // History chart
    page.push_str("  <div class=\"charts\">\n    <div class=\"chart-box\">\n");
    page.push_str("      <h2>History</h2>\n      <div class=\"period\">\n");
    page.push_str("        <label>Period: </label>\n        <select id=\"period\">\n");
    for (seconds, label) in PERIOD_CHOICES {
        let selected = if *seconds == options.default_period_secs {
            " selected"
        } else {
            ""
        };
        let _ = writeln!(
            page,
            "          <option value=\"{}\"{}>{}</option>",
            seconds, selected, label
        );
    }
    page.push_str("        </select>\n      </div>\n");
    page.push_str("      <canvas id=\"chart\" height=\"220\"></canvas>\n");
    page.push_str("    </div>\n  </div>\n");

    let _ = writeln!(
        page,
        "  <p class=\"foot\">Page refresh {}s · History every {}s</p>",
        options.refresh_secs, options.cadence_secs
    );

    page.push_str("  <script>\n");
    page.push_str(CHART_SCRIPT);
    let _ = writeln!(page, "    loadHistory({});", options.default_period_secs);
    page.push_str("  </script>\n</body>\n</html>\n");

    page
}

fn push_card(page: &mut String, heading: &str, value: &str, sub: Option<&str>) {
    let _ = write!(
        page,
        "    <div class=\"card\"><h2>{}</h2><div class=\"val\">{}</div>",
        heading, value
    );
    if let Some(sub) = sub {
        let _ = write!(page, "<div class=\"sub\">{}</div>", sub);
    }
    page.push_str("</div>\n");
}

/// Format a one-decimal metric, or the placeholder.
fn one_decimal(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.1}", v),
        None => PLACEHOLDER.to_string(),
    }
}

/// Format a metric as the kernel reported it, or the placeholder.
fn plain(value: Option<f64>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => PLACEHOLDER.to_string(),
    }
}

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
