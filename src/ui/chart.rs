// ============================================================================
// Chart rendering
// ============================================================================
// Draws the shared chart instance as a ratatui line chart, one dataset per
// plotted series. All series share the single-view axes defined by the
// primary; overlays never retitle or re-scale per series, the bounds simply
// grow to fit every plotted point.
// ============================================================================

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::app::App;
use crate::chart::ChartInstance;

/// Draws the chart area: the live instance if one exists, a placeholder
/// otherwise.
pub fn render_chart(frame: &mut Frame, app: &App, area: Rect) {
    match app.chart.instance() {
        Some(instance) => render_instance(frame, instance, area),
        None => render_placeholder(frame, area),
    }
}

fn render_instance(frame: &mut Frame, instance: &ChartInstance, area: Rect) {
    // Shared x origin: the oldest date across every plotted series.
    let origin = instance
        .series
        .iter()
        .filter_map(|p| p.series.first())
        .map(|p| p.date)
        .min();

    let origin = match origin {
        Some(date) => date,
        None => {
            // An empty series never reaches the chart; nothing to draw.
            render_placeholder(frame, area);
            return;
        }
    };

    // Per-series point vectors must outlive the datasets borrowing them.
    let point_sets: Vec<Vec<(f64, f64)>> = instance
        .series
        .iter()
        .map(|plotted| {
            plotted
                .series
                .points
                .iter()
                .map(|p| ((p.date - origin).num_days() as f64, p.value))
                .collect()
        })
        .collect();

    let datasets: Vec<Dataset> = instance
        .series
        .iter()
        .zip(point_sets.iter())
        .map(|(plotted, points)| {
            Dataset::default()
                .name(plotted.series.label.as_str())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(plotted.color.line()))
                .data(points)
        })
        .collect();

    // Shared bounds over every plotted series.
    let x_max = point_sets
        .iter()
        .flatten()
        .map(|&(x, _)| x)
        .fold(0.0f64, f64::max);
    let y_min = instance
        .series
        .iter()
        .filter_map(|p| p.series.min_value())
        .fold(f64::MAX, f64::min);
    let y_max = instance
        .series
        .iter()
        .filter_map(|p| p.series.max_value())
        .fold(f64::MIN, f64::max);

    // 5% breathing room on the value axis, floored at zero.
    let margin = (y_max - y_min) * 0.05;
    let y_lo = (y_min - margin).max(0.0);
    let y_hi = y_max + margin;

    let last_date = instance
        .series
        .iter()
        .filter_map(|p| p.series.last())
        .map(|p| p.date)
        .max()
        .unwrap_or(origin);

    let x_axis = Axis::default()
        .title(instance.x_label.as_str())
        .style(Style::default().fg(Color::Gray))
        .bounds([0.0, x_max.max(1.0)])
        .labels(vec![
            Span::raw(origin.format("%Y-%m").to_string()),
            Span::raw(last_date.format("%Y-%m").to_string()),
        ]);

    let y_axis = Axis::default()
        .title(instance.y_label.as_str())
        .style(Style::default().fg(Color::Gray))
        .bounds([y_lo, y_hi])
        .labels(vec![
            Span::raw(format!("${y_lo:.0}")),
            Span::raw(format!("${:.0}", (y_lo + y_hi) / 2.0)),
            Span::raw(format!("${y_hi:.0}")),
        ]);

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", instance.title)),
        )
        .x_axis(x_axis)
        .y_axis(y_axis);

    frame.render_widget(chart, area);
}

fn render_placeholder(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Chart ");

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "No chart. Press 'g' on a widget to plot its price history.",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
