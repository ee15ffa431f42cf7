//! Text and JSON rendering of a [`DashboardView`].

use crate::{DashboardView, ImageryView};

/// Render the view as plain text.
///
/// The chart, if present, is printed every `chart_step_days` days; the last
/// day is always included.
pub fn render_text(view: &DashboardView, chart_step_days: usize) -> String {
    let step = chart_step_days.max(1);
    let mut lines = vec![
        view.title.clone(),
        "=".repeat(view.title.chars().count()),
        view.description.clone(),
        String::new(),
        view.map.caption.clone(),
        format!(
            "  centre {:.6}, {:.6}  zoom {}  basemap {}",
            view.map.center.lat, view.map.center.lon, view.map.zoom, view.map.basemap
        ),
    ];

    match &view.imagery {
        ImageryView::Available { before, after } => {
            for mosaic in [before, after] {
                let source = mosaic.url_format.as_deref().unwrap_or(&mosaic.id);
                lines.push(format!("  {} {}  {}", mosaic.label, mosaic.date, source));
            }
            lines.push(format!("  imagery: {}", view.map.attribution));
        }
        ImageryView::Unavailable { reason } => {
            lines.push(format!("  imagery unavailable: {}", reason));
        }
    }
    lines.push(String::new());

    lines.push(metric("Start date", view.metrics.start_date));
    lines.push(metric("Current date", view.metrics.current_date));
    lines.push(metric("Current advance", &view.metrics.current_advance));

    match &view.prediction {
        Some(prediction) => {
            lines.push(metric("Predicted completion", prediction.finish_date));
            lines.push(metric("Days remaining", prediction.days_remaining));
            if prediction.already_complete {
                lines.push("Already complete at the current date.".to_string());
            }
        }
        None => lines.push("No forecast: no progress recorded.".to_string()),
    }

    if let Some(chart) = &view.chart {
        lines.push(String::new());
        lines.push("Extrapolation".to_string());
        let last = chart.len().saturating_sub(1);
        lines.extend(
            chart
                .iter()
                .enumerate()
                .filter(|(i, _)| i % step == 0 || *i == last)
                .map(|(_, point)| format!("  {}  {:>7.2}%", point.date, point.percent)),
        );
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Render the view as pretty-printed JSON.
pub fn render_json(view: &DashboardView) -> serde_json::Result<String> {
    serde_json::to_string_pretty(view)
}

fn metric(label: &str, value: impl std::fmt::Display) -> String {
    format!("{:<22}{}", label, value)
}
