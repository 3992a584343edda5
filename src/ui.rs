//! The UI renders the preview state into a page and its sidebar.
//!
//! The page scrolls under the viewport; the sidebar is drawn wherever the affix places
//! it, with the scroll-spy's active entry highlighted. A collapsed host draws no sidebar.

use crate::affix::AffixState;
use crate::app_state::{PreviewState, RowKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Renders the page, the sidebar and the help bar.
pub fn draw(f: &mut Frame, app: &PreviewState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(f.area());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(app.sidebar_width()),
        ])
        .split(chunks[0]);

    draw_page(f, app, columns[0]);
    if !app.is_collapsed() {
        draw_sidebar(f, app, columns[1]);
    }

    let affix = match app.sync.affix_state() {
        Some(AffixState::Top) => "top",
        Some(AffixState::Pinned) => "pinned",
        Some(AffixState::Bottom) => "bottom",
        None if app.is_collapsed() => "collapsed",
        None => "settling",
    };
    let help = format!(
        "↑/↓: Scroll | PgUp/PgDn: Page | Home/End: Jump | q: Quit    row {}/{} | sidebar: {affix}",
        app.scroll,
        app.max_scroll()
    );
    let help_widget = Paragraph::new(help).block(Block::default().borders(Borders::ALL));
    f.render_widget(help_widget, chunks[1]);
}

fn draw_page(f: &mut Frame, app: &PreviewState, area: Rect) {
    let active = app.sync.active();
    let lines: Vec<Line> = app
        .rows
        .iter()
        .skip(app.scroll)
        .take(usize::from(area.height))
        .map(|row| match &row.kind {
            RowKind::Banner => Line::from(Span::styled(
                row.text.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            RowKind::Heading { id, .. } => {
                let style = if Some(id.as_str()) == active {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
                };
                Line::from(Span::styled(row.text.clone(), style))
            }
            RowKind::Body => Line::from(row.text.clone()),
            RowKind::Footer => Line::from(Span::styled(
                row.text.clone(),
                Style::default().fg(Color::DarkGray),
            )),
        })
        .collect();

    f.render_widget(Paragraph::new(lines), area);
}

fn draw_sidebar(f: &mut Frame, app: &PreviewState, column: Rect) {
    let entries = app.sidebar_entries();
    let active = app.sync.active();

    // Rows of the sidebar hidden above the viewport
    let top = app.sidebar_top();
    let hidden = usize::try_from(-top.min(0)).unwrap_or(0);
    let visible_top = u16::try_from(top.max(0)).unwrap_or(u16::MAX);
    if visible_top >= column.height {
        return;
    }

    let height = app.sidebar_height().saturating_sub(hidden);
    let area = Rect {
        x: column.x,
        y: column.y + visible_top,
        width: column.width,
        height: u16::try_from(height)
            .unwrap_or(u16::MAX)
            .min(column.height - visible_top),
    };

    let lines: Vec<Line> = entries
        .iter()
        .skip(hidden.saturating_sub(1))
        .map(|entry| {
            let text = format!("{}{}", "  ".repeat(entry.depth), entry.text);
            if Some(entry.id.as_str()) == active {
                Line::from(Span::styled(
                    text,
                    Style::default().add_modifier(Modifier::REVERSED),
                ))
            } else {
                Line::from(text)
            }
        })
        .collect();

    let block = if hidden == 0 {
        Block::default().borders(Borders::ALL).title("Contents")
    } else {
        Block::default().borders(Borders::LEFT | Borders::RIGHT | Borders::BOTTOM)
    };
    f.render_widget(Paragraph::new(lines).block(block), area);
}
