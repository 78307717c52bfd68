//! Stateless UI rendering for the line-sweep board.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction as LayoutDirection, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::app::App;
use linesweep::{Actor, Marker, MoveRequest, ViewTree};
use std::collections::HashSet;

const MIN_CELL_WIDTH: u16 = 3;

/// Renders the whole screen from application state.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(LayoutDirection::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Length(3), // Score and turn
            Constraint::Min(3),    // Board
            Constraint::Length(1), // Help
        ])
        .split(area);

    let title = Paragraph::new("Linesweep")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    draw_status(frame, chunks[1], app);

    match app.view() {
        Some(view) => draw_board(frame, chunks[2], view, app.cursor(), app.input_locked()),
        None => {
            let waiting = Paragraph::new("No board yet")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center);
            frame.render_widget(waiting, chunks[2]);
        }
    }

    let target = app
        .view()
        .and_then(|view| view.header(app.cursor().direction, app.cursor().index))
        .map(|header| format!(" {}", header.label()))
        .unwrap_or_default();
    let mut help = format!("←→↑↓ select  Enter sweep{}  n new game", target);
    if app.has_board_file() {
        help.push_str("  u upload");
    }
    help.push_str("  q quit");
    let help = Paragraph::new(help)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(help, chunks[3]);

    if let Some(notice) = app.notice() {
        draw_notice(frame, area, notice);
    }
}

fn draw_status(frame: &mut Frame, area: Rect, app: &App) {
    let score = app.score();
    let turn_color = match app.turn() {
        Actor::Player => Color::Yellow,
        Actor::Ai => Color::Magenta,
    };
    let line = Line::from(vec![
        Span::styled(
            format!("You {}", score.player()),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        Span::styled(
            format!("AI {}", score.ai()),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        Span::styled(app.status_message().to_string(), Style::default().fg(turn_color)),
    ]);

    let status = Paragraph::new(line)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, area);
}

fn draw_board(frame: &mut Frame, area: Rect, view: &ViewTree, cursor: MoveRequest, locked: bool) {
    let (width, height) = cell_size(view, area);
    let cell_width = usize::from(width);

    let header_style = |request: MoveRequest| {
        let base = if locked {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        };
        if request == cursor {
            base.bg(Color::White).fg(Color::Black)
        } else {
            base
        }
    };

    let swept: HashSet<(usize, usize)> = view
        .line(cursor)
        .into_iter()
        .map(|cell| (*cell.row(), *cell.col()))
        .collect();

    let mut lines = Vec::with_capacity(view.rows() * usize::from(height) + 1);

    let mut header = vec![Span::raw(" ".repeat(cell_width))];
    for cell in view.column_headers() {
        header.push(Span::styled(
            centered(cell.label(), cell_width),
            header_style(*cell.target()),
        ));
    }
    lines.push(Line::from(header));

    for (row_header, cells) in view.row_headers().iter().zip(view.cells()) {
        for band in 0..height {
            let label = if band == height / 2 { row_header.label().as_str() } else { "" };
            let mut spans = vec![Span::styled(
                centered(label, cell_width),
                header_style(*row_header.target()),
            )];
            for cell in cells {
                let on_cursor = swept.contains(&(*cell.row(), *cell.col()));
                let (symbol, mut style) = match cell.marker() {
                    Marker::Stone => (
                        "●",
                        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                    ),
                    Marker::Blank => ("·", Style::default().fg(Color::DarkGray)),
                };
                if on_cursor && !locked {
                    style = style.bg(Color::DarkGray);
                }
                let symbol = if band == height / 2 { symbol } else { "" };
                spans.push(Span::styled(centered(symbol, cell_width), style));
            }
            lines.push(Line::from(spans));
        }
    }

    let board_width = width.saturating_mul(u16::try_from(view.cols() + 1).unwrap_or(u16::MAX));
    let board_height = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    let board_area = center_rect(area, board_width, board_height);
    frame.render_widget(Paragraph::new(lines), board_area);
}

/// Cell size for the space actually available, squares halved in height
/// since terminal cells are about twice as tall as they are wide.
fn cell_size(view: &ViewTree, area: Rect) -> (u16, u16) {
    let width = (*view.resized(area.width).square_size()).max(MIN_CELL_WIDTH);
    (width, (width / 2).max(1))
}

fn draw_notice(frame: &mut Frame, area: Rect, notice: &str) {
    let popup = center_rect(area, 44.min(area.width), 7.min(area.height));
    let mut text: Vec<Line> = notice.lines().map(Line::from).collect();
    text.push(Line::from(""));
    text.push(Line::from(Span::styled(
        "Enter to continue",
        Style::default().fg(Color::DarkGray),
    )));

    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        );
    frame.render_widget(Clear, popup);
    frame.render_widget(paragraph, popup);
}

fn centered(text: &str, width: usize) -> String {
    format!("{:^width$}", text, width = width)
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centers_labels() {
        assert_eq!(centered("A", 3), " A ");
        assert_eq!(centered("AB", 4), " AB ");
    }

    #[test]
    fn cells_scale_with_terminal_width() {
        let view = linesweep::render(3, 3, &vec![vec![linesweep::Cell::Empty; 3]; 3], 48).unwrap();
        assert_eq!(cell_size(&view, Rect::new(0, 0, 80, 20)), (20, 10));
        assert_eq!(cell_size(&view, Rect::new(0, 0, 8, 20)), (MIN_CELL_WIDTH, 1));
    }

    #[test]
    fn center_rect_stays_inside_area() {
        let area = Rect::new(2, 1, 20, 10);
        let inner = center_rect(area, 30, 4);
        assert_eq!(inner, Rect::new(2, 4, 20, 4));
    }
}
