// ============================================================================
// Dashboard rendering
// ============================================================================
// One render pass over the App state per frame: header, catalog panel on the
// left, widget cards and the shared chart on the right, status footer. The
// widgets and the chart are pure state; this module is the only place that
// turns them into terminal output.
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::{App, Panel};
use crate::models::{WidgetAction, WidgetState};
use crate::ui::chart::render_chart;

/// Top-level render routine called by the event loop every frame.
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(0),    // body
            Constraint::Length(3), // footer
        ])
        .split(frame.size());

    render_header(frame, chunks[0]);
    render_body(frame, app, chunks[1]);
    render_footer(frame, app, chunks[2]);
}

fn render_header(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let title = Line::from(vec![
        Span::styled(
            "Commodity Dashboard",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  —  browse, open widgets, overlay price history"),
    ]);

    let paragraph = Paragraph::new(title)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

fn render_body(frame: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(34), Constraint::Min(0)])
        .split(area);

    render_catalog(frame, app, columns[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(12), Constraint::Min(0)])
        .split(columns[1]);

    render_widgets(frame, app, right[0]);
    render_chart(frame, app, right[1]);
}

// ============================================================================
// Catalog panel
// ============================================================================

fn render_catalog(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Panel::Catalog;
    let border = if focused { Color::Yellow } else { Color::White };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(" Commodities ");

    if app.catalog.is_empty() {
        // Catalog source failed or returned nothing: no options to show.
        let paragraph = Paragraph::new("Select a commodity...\n\n(no catalog loaded)")
            .block(block)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = app
        .catalog
        .iter()
        .map(|record| {
            let open_marker = if app.registry.is_open(record.id) {
                "● "
            } else {
                "  "
            };
            ListItem::new(format!("{}{} ({})", open_marker, record.name, record.code))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.catalog_index));
    frame.render_stateful_widget(list, area, &mut state);
}

// ============================================================================
// Widget cards
// ============================================================================

fn render_widgets(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Panel::Widgets;
    let border = if focused { Color::Yellow } else { Color::White };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(format!(" Widgets ({}) ", app.registry.len()));

    if app.registry.is_empty() {
        let paragraph = Paragraph::new("No widgets open. Select a commodity and press Enter.")
            .block(block)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = app
        .registry
        .iter()
        .map(|widget| widget_card(app, widget))
        .collect();

    let list = List::new(items).block(block).highlight_symbol("> ");

    let mut state = ListState::default();
    if focused {
        state.select(Some(app.widget_index));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

/// One card: name, code, information, and the three affordances. The
/// commodity currently charted as primary is marked.
fn widget_card<'a>(app: &App, widget: &'a WidgetState) -> ListItem<'a> {
    let record = &widget.commodity;
    let is_primary = app.chart.primary_id() == Some(record.id);

    let mut title_spans = vec![Span::styled(
        record.name.as_str(),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];
    title_spans.push(Span::raw(format!("  Code: {}", record.code)));
    if is_primary {
        title_spans.push(Span::styled(
            "  [primary]",
            Style::default().fg(Color::Green),
        ));
    }

    let actions = WidgetAction::all()
        .iter()
        .map(|a| format!("[{}] {}", action_key(*a), a.label()))
        .collect::<Vec<_>>()
        .join("  ");

    ListItem::new(vec![
        Line::from(title_spans),
        Line::from(Span::raw(record.information.clone())),
        Line::from(Span::styled(actions, Style::default().fg(Color::DarkGray))),
    ])
}

fn action_key(action: WidgetAction) -> char {
    match action {
        WidgetAction::ShowGraph => 'g',
        WidgetAction::Compare => 'c',
        WidgetAction::Remove => 'd',
    }
}

// ============================================================================
// Footer
// ============================================================================

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL);

    let line = if app.confirm_quit {
        Line::from(Span::styled(
            "Press 'q' again to quit",
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
        ))
    } else if app.is_loading {
        let message = app
            .loading_message
            .as_deref()
            .unwrap_or("Loading...");
        Line::from(Span::styled(message, Style::default().fg(Color::Yellow)))
    } else if let Some(status) = &app.status {
        Line::from(Span::styled(
            status.as_str(),
            Style::default().fg(Color::Red),
        ))
    } else {
        Line::from(vec![
            Span::styled("↑↓", Style::default().fg(Color::Yellow)),
            Span::raw(" navigate  "),
            Span::styled("Enter", Style::default().fg(Color::Yellow)),
            Span::raw(" open widget  "),
            Span::styled("Tab", Style::default().fg(Color::Yellow)),
            Span::raw(" switch panel  "),
            Span::styled("g/c/d", Style::default().fg(Color::Yellow)),
            Span::raw(" graph/compare/remove  "),
            Span::styled("q", Style::default().fg(Color::Yellow)),
            Span::raw(" quit"),
        ])
    };

    let paragraph = Paragraph::new(line)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
