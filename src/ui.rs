use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;

/// Header title line plus its bottom rule
const HEADER_LINES: u16 = 2;

/// Rows of the bordered table block, saturating at the terminal limit
fn table_height(view_height: usize) -> u16 {
    u16::try_from(view_height)
        .unwrap_or(u16::MAX)
        .saturating_add(HEADER_LINES + 2)
}

pub fn render(frame: &mut Frame, app: &App) {
    let height = table_height(app.view.height());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(height),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(frame.size());

    render_table(frame, app, chunks[0]);
    render_status_bar(frame, app, chunks[1]);
}

fn render_table(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border.to_ratatui());

    let table = Paragraph::new(app.view.view()).block(block);
    frame.render_widget(table, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let grid = app.view.grid();
    let position = match app.view.cursor() {
        Some((row, col)) => format!(
            "row {}/{}  col {}/{}",
            row + 1,
            grid.row_count(),
            col + 1,
            grid.col_count()
        ),
        None => "no rows".to_string(),
    };

    let mut spans = vec![
        Span::raw(format!(" {} ", app.file_name)),
        Span::raw(" "),
        Span::raw(position),
    ];
    if let Some(count) = app.pending_count() {
        spans.push(Span::raw(format!("  {}", count)));
    }
    if let Some(msg) = &app.message {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(msg.clone(), app.theme.message_warning.to_ratatui()));
    }

    let status_bar = Paragraph::new(Line::from(spans)).style(app.theme.status_bar.to_ratatui());
    frame.render_widget(status_bar, area);
}
