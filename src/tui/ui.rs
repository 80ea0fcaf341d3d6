//! Stateless rendering of the puzzle board.

use connections_core::{
    BoardState, CategoryColor, CategoryIndex, GameBoard, PuzzleSession, SessionStatus, TileView,
    WORDS_PER_CATEGORY,
};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::app::App;

/// Renders the whole screen.
pub fn draw(frame: &mut Frame, board: &GameBoard, app: &App, player: &str) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(12),   // Board
            Constraint::Length(3), // Status
        ])
        .split(area);

    let title = match board.session() {
        Some(session) => format!("Connections: {}", session.puzzle().name()),
        None => "Connections".to_string(),
    };
    let title = Paragraph::new(Line::from(vec![
        Span::styled(
            title,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  ({})", player),
            Style::default().fg(Color::DarkGray),
        ),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    match board.state() {
        BoardState::Loading => draw_notice(frame, chunks[1], "Loading puzzle...", Color::Gray),
        BoardState::Error(message) => draw_notice(
            frame,
            chunks[1],
            &format!("{}\n\nPress n to try again, q to quit", message),
            Color::Red,
        ),
        BoardState::Ready(session) => draw_session(frame, chunks[1], session, app.cursor()),
    }

    let status = Paragraph::new(status_line(board, app))
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, chunks[2]);
}

fn draw_notice(frame: &mut Frame, area: Rect, text: &str, color: Color) {
    let notice = Paragraph::new(text.to_string())
        .style(Style::default().fg(color))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(notice, area);
}

fn draw_session(frame: &mut Frame, area: Rect, session: &PuzzleSession, cursor: usize) {
    let answers = session.reveal_all().filter(|_| session.status() == SessionStatus::Lost);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(if answers.is_some() {
            [Constraint::Percentage(65), Constraint::Percentage(35)]
        } else {
            [Constraint::Percentage(100), Constraint::Percentage(0)]
        })
        .split(area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(columns[0]);

    let views = session.tile_views();
    for (row, chunk) in views.chunks(WORDS_PER_CATEGORY).enumerate() {
        draw_row(frame, rows[row], chunk, cursor);
    }

    if let Some(categories) = answers {
        let lines: Vec<Line> = categories
            .iter()
            .zip(CategoryIndex::ALL)
            .map(|(category, index)| {
                Line::from(vec![
                    Span::styled(
                        format!("{}: ", category.name()),
                        Style::default()
                            .fg(color_of(index.color()))
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(category.words().join(", ")),
                ])
            })
            .collect();
        let panel = Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(Block::default().title("Answers").borders(Borders::ALL));
        frame.render_widget(panel, columns[1]);
    }
}

fn draw_row(frame: &mut Frame, area: Rect, views: &[TileView<'_>], cursor: usize) {
    // A solved row is one contiguous group.
    let solved = views
        .first()
        .and_then(|v| v.found)
        .filter(|&first| views.iter().all(|v| v.found == Some(first)));
    if let Some(first) = solved {
        let name = views[0].category_name.unwrap_or_default();
        let words: Vec<&str> = views.iter().map(|v| v.word).collect();
        let style = Style::default().bg(color_of(first.color())).fg(Color::Black);
        let text = vec![
            Line::from(Span::styled(
                name.to_string(),
                style.add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(words.join(", "), style)),
        ];
        let bar = Paragraph::new(text)
            .style(style)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(bar, area);
        return;
    }

    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    for (view, cell) in views.iter().zip(cells.iter()) {
        draw_tile(frame, *cell, view, view.position == cursor);
    }
}

fn draw_tile(frame: &mut Frame, area: Rect, view: &TileView<'_>, under_cursor: bool) {
    let style = if view.selected {
        Style::default()
            .bg(Color::DarkGray)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    let border = if under_cursor {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let tile = Paragraph::new(view.word.to_uppercase())
        .style(style)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(border));
    frame.render_widget(tile, area);
}

fn color_of(color: CategoryColor) -> Color {
    let (r, g, b) = color.rgb();
    Color::Rgb(r, g, b)
}

fn tries_dots(session: &PuzzleSession) -> String {
    let max = session.rules().max_wrong_tries();
    let left = session.remaining_tries();
    (0..max)
        .map(|i| if i < left { "●" } else { "○" })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text for the status bar.
pub fn status_line(board: &GameBoard, app: &App) -> String {
    let Some(session) = board.session() else {
        return "q quit".to_string();
    };
    let message = app.message().map(|m| format!("{}  ", m)).unwrap_or_default();

    match session.status() {
        SessionStatus::InProgress => format!(
            "{}Mistakes remaining: {}   space select, enter submit, s shuffle, n new, q quit",
            message,
            tries_dots(session)
        ),
        SessionStatus::LostButContinuing => format!(
            "{}Wrong guesses: {}   space select, enter submit, s shuffle, n new, q quit",
            message,
            session.wrong_tries()
        ),
        SessionStatus::Lost => format!("{}Keep playing? (y/n)", message),
        SessionStatus::Won => format!(
            "Solved with {} mistakes! n new game, q quit",
            session.wrong_tries()
        ),
    }
}
