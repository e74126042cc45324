use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Paragraph, Row, Table, Widget, Wrap},
};

use unicode_width::UnicodeWidthStr;

use crate::leaderboard::{LeaderboardEntry, Partition, Standings};

pub const EMPTY_GLOBAL: &str = "No scores yet. Be the first!";
pub const EMPTY_PERSONAL: &str = "You haven't set any scores yet. Start typing!";
pub const NO_IDENTITY: &str = "Set --user to see your personal best scores";
pub const LOADING: &str = "Loading scores...";

const YOU: &str = " (you)";
const NAME_COLUMN: usize = 24;

/// Which of the two tables a row belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Board {
    Global,
    Personal,
}

impl Board {
    fn title(&self) -> &'static str {
        match self {
            Board::Global => "Global",
            Board::Personal => "Personal",
        }
    }

    fn header(&self) -> [&'static str; 4] {
        match self {
            Board::Global => ["#", "Name", "WPM", "Acc"],
            Board::Personal => ["#", "Date", "WPM", "Acc"],
        }
    }
}

/// Rank, name or date, rounded wpm, accuracy
pub fn entry_cells(
    board: Board,
    rank: usize,
    entry: &LeaderboardEntry,
    identity: Option<&str>,
) -> [String; 4] {
    let who = match board {
        Board::Global if identity == Some(entry.identity_id.as_str()) => {
            format!("{}{YOU}", entry.display_name)
        }
        Board::Global => entry.display_name.clone(),
        Board::Personal => entry.created_at.format("%b %-d").to_string(),
    };
    [
        rank.to_string(),
        who,
        entry.display_wpm().to_string(),
        format!("{:.1}%", entry.accuracy),
    ]
}

/// Message shown in place of an empty table
pub fn empty_message(board: Board, entries: Option<&[LeaderboardEntry]>) -> Option<&'static str> {
    match (board, entries) {
        (Board::Personal, None) => Some(NO_IDENTITY),
        (Board::Global, Some([])) | (Board::Global, None) => Some(EMPTY_GLOBAL),
        (Board::Personal, Some([])) => Some(EMPTY_PERSONAL),
        _ => None,
    }
}

/// Pads by display width so wide names keep the columns aligned
fn pad_to_width(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(s.width());
    format!("{s}{}", " ".repeat(fill))
}

/// Plain-text rendition for printing outside the terminal UI
pub fn text_report(partition: Partition, standings: &Standings, identity: Option<&str>) -> String {
    let mut out = format!("Leaderboard: {}\n", partition.label());
    let boards = [
        (Board::Global, Some(standings.global.as_slice())),
        (Board::Personal, standings.personal.as_deref()),
    ];

    for (board, entries) in boards {
        out.push_str(&format!("\n{}\n", board.title()));
        if let Some(msg) = empty_message(board, entries) {
            out.push_str(&format!("  {msg}\n"));
            continue;
        }
        let header = board.header();
        out.push_str(&format!(
            "  {:>3}  {} {:>5} {:>7}\n",
            header[0],
            pad_to_width(header[1], NAME_COLUMN),
            header[2],
            header[3]
        ));
        for (i, entry) in entries.unwrap_or_default().iter().enumerate() {
            let [rank, who, wpm, acc] = entry_cells(board, i + 1, entry, identity);
            let who = pad_to_width(&who, NAME_COLUMN);
            out.push_str(&format!("  {rank:>3}  {who} {wpm:>5} {acc:>7}\n"));
        }
    }
    out
}

fn render_board(
    board: Board,
    entries: Option<&[LeaderboardEntry]>,
    identity: Option<&str>,
    loading: bool,
    area: Rect,
    buf: &mut Buffer,
) {
    let block = Block::bordered().title(Span::styled(
        board.title(),
        Style::default().add_modifier(Modifier::BOLD),
    ));

    let message = match (loading, entries) {
        (true, Some(_)) => Some(LOADING),
        _ => empty_message(board, entries),
    };
    if let Some(msg) = message {
        Paragraph::new(Span::styled(
            msg,
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block)
        .render(area, buf);
        return;
    }

    let rows = entries
        .unwrap_or_default()
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let cells = entry_cells(board, i + 1, entry, identity);
            let mine = board == Board::Global && identity == Some(entry.identity_id.as_str());
            let style = if mine {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Row::new(cells).style(style)
        })
        .collect_vec();

    let widths = [
        Constraint::Length(3),
        Constraint::Min(8),
        Constraint::Length(5),
        Constraint::Length(7),
    ];
    Table::new(rows, widths)
        .header(
            Row::new(board.header())
                .style(Style::default().add_modifier(Modifier::BOLD | Modifier::DIM)),
        )
        .block(block)
        .render(area, buf);
}

/// Global and personal tables side by side. While `loading`, both tables
/// show a placeholder instead of their empty state.
pub fn render_leaderboard(
    partition: Partition,
    standings: &Standings,
    identity: Option<&str>,
    loading: bool,
    area: Rect,
    buf: &mut Buffer,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    Paragraph::new(Span::styled(
        format!("Leaderboard: {}", partition.label()),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .render(chunks[0], buf);

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    render_board(
        Board::Global,
        Some(standings.global.as_slice()),
        identity,
        loading,
        halves[0],
        buf,
    );
    render_board(
        Board::Personal,
        standings.personal.as_deref(),
        identity,
        loading,
        halves[1],
        buf,
    );

    Paragraph::new(Span::styled(
        "(b)ack / (r)estart / (esc)ape",
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .render(chunks[2], buf);
}
