pub mod charting;
pub mod leaderboard;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Axis, Chart, Dataset, Gauge, GraphType, Paragraph, Widget, Wrap},
};

use crate::app::{App, SaveStatus, Screen};
use crate::celebration::CelebrationAnimation;
use crate::engine::{Phase, TypingSession, WpmSample};
use crate::leaderboard::Partition;
use crate::session::{Mode, SessionConfig};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

pub const PERSONAL_BEST_BANNER: &str = "New Personal Best!";
pub const ANONYMOUS_HINT: &str = "Set --user to save your scores and track personal bests";

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim_bold() -> Style {
    bold().add_modifier(Modifier::DIM)
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = Layout::default()
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([Constraint::Min(0)])
            .split(area)[0];

        match self.screen() {
            Screen::Typing => render_typing(self, inner, buf),
            Screen::Results => render_results(self, inner, buf),
            Screen::Leaderboard => leaderboard::render_leaderboard(
                Partition::from(self.session().config()),
                self.standings(),
                self.identity(),
                self.is_loading_leaderboard(),
                inner,
                buf,
            ),
        }

        if self.celebration.is_active() {
            render_celebration_particles(&self.celebration, area, buf);
        }
    }
}

/// Mode and limit choices, with the active ones highlighted
fn selector_line(cfg: SessionConfig, locked: bool) -> Line<'static> {
    let active = if locked {
        dim_bold()
    } else {
        bold().fg(Color::Yellow)
    };
    let inactive = Style::default().add_modifier(Modifier::DIM);
    let pick = |on: bool| if on { active } else { inactive };

    let mut spans = vec![
        Span::styled("words", pick(cfg.mode == Mode::Words)),
        Span::raw("  "),
        Span::styled("time", pick(cfg.mode == Mode::Time)),
        Span::styled("   |  ", inactive),
    ];
    for &limit in cfg.mode.allowed_limits() {
        spans.push(Span::styled(limit.to_string(), pick(limit == cfg.limit)));
        spans.push(Span::raw("  "));
    }
    Line::from(spans)
}

fn live_stats_line(session: &TypingSession) -> String {
    let live = session.live();
    let mut line = format!("{} wpm   {}% acc", live.wpm, live.accuracy);
    if let Some(limit) = session.config().time_limit_secs() {
        let remaining = session.seconds_remaining().unwrap_or(limit).max(0.0);
        line.push_str(&format!("   {}s", remaining.ceil() as u64));
    }
    line
}

/// Target text styled by what has been typed against it
fn prompt_spans(session: &TypingSession) -> Vec<Span<'static>> {
    let correct = bold().fg(Color::Green);
    let wrong = bold().fg(Color::Red);
    let overtyped = bold().fg(Color::Rgb(255, 165, 0));
    let untyped = dim_bold();
    let caret = dim_bold().add_modifier(Modifier::UNDERLINED);

    let show_caret = session.phase() != Phase::Completed;
    let (word_idx, char_idx) = (session.word_index(), session.char_index());
    let mut spans = Vec::new();

    for (i, target) in session.text().tokens().iter().enumerate() {
        let target: Vec<char> = target.chars().collect();
        let typed: Vec<char> = session.typed(i).chars().collect();

        for j in 0..target.len().max(typed.len()) {
            let span = match (typed.get(j), target.get(j)) {
                (Some(t), Some(e)) if t == e => Span::styled(e.to_string(), correct),
                (Some(t), Some(_)) => Span::styled(t.to_string(), wrong),
                (Some(t), None) => Span::styled(t.to_string(), overtyped),
                (None, Some(e)) => {
                    let at_caret = show_caret && i == word_idx && j == char_idx;
                    Span::styled(e.to_string(), if at_caret { caret } else { untyped })
                }
                (None, None) => continue,
            };
            spans.push(span);
        }

        let caret_on_gap = show_caret && i == word_idx && char_idx >= target.len();
        if caret_on_gap {
            spans.push(Span::styled(" ", caret));
        } else if i + 1 < session.text().len() {
            spans.push(Span::raw(" "));
        }
    }
    spans
}

fn render_typing(app: &App, area: Rect, buf: &mut Buffer) {
    let session = app.session();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // selector
            Constraint::Length(1), // live stats
            Constraint::Length(1), // progress
            Constraint::Length(1), // padding
            Constraint::Min(1),    // prompt
            Constraint::Length(1), // legend
        ])
        .split(area);

    Paragraph::new(selector_line(session.config(), session.has_started()))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

    Paragraph::new(Span::styled(live_stats_line(session), bold()))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    let progress = session.progress(app.now());
    let label = match session.config().mode {
        Mode::Words => format!("{}/{}", session.word_index(), session.text().len()),
        Mode::Time => format!("{progress:.0}%"),
    };
    Gauge::default()
        .gauge_style(Style::default().fg(Color::Magenta))
        .ratio((progress / 100.0).clamp(0.0, 1.0))
        .label(label)
        .render(chunks[2], buf);

    Paragraph::new(Line::from(prompt_spans(session)))
        .wrap(Wrap { trim: true })
        .render(chunks[4], buf);

    let legend = if session.has_started() {
        "(tab) restart / (esc)ape"
    } else {
        "(↑↓) mode / (←→) limit / (tab) new text / (esc)ape"
    };
    Paragraph::new(Span::styled(
        legend,
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .render(chunks[5], buf);
}

fn save_status_line(status: SaveStatus) -> Span<'static> {
    let muted = Style::default()
        .fg(Color::Gray)
        .add_modifier(Modifier::ITALIC);
    match status {
        SaveStatus::Idle => Span::raw(""),
        SaveStatus::Saving => Span::styled("saving…", muted),
        SaveStatus::Saved { .. } => Span::styled("saved", Style::default().fg(Color::Green)),
        SaveStatus::NotSaved => Span::styled("not saved", Style::default().fg(Color::Red)),
        SaveStatus::Anonymous => Span::styled(ANONYMOUS_HINT, muted),
    }
}

fn render_results(app: &App, area: Rect, buf: &mut Buffer) {
    let Some(result) = app.result() else {
        return;
    };
    let samples = app.session().samples();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // mode label
            Constraint::Length(1), // stats
            Constraint::Length(1), // counts
            Constraint::Min(3),    // chart
            Constraint::Length(1), // banner
            Constraint::Length(1), // save status
            Constraint::Length(1), // legend
        ])
        .split(area);

    Paragraph::new(Span::styled(
        result.config().label(),
        bold().fg(Color::Cyan),
    ))
    .alignment(Alignment::Center)
    .render(chunks[0], buf);

    Paragraph::new(Span::styled(
        format!(
            "{} wpm   {:.1}% acc   {} raw   {:.1}s",
            result.display_wpm(),
            result.accuracy,
            result.display_raw_wpm(),
            result.time_elapsed_secs
        ),
        bold(),
    ))
    .alignment(Alignment::Center)
    .render(chunks[1], buf);

    Paragraph::new(format!(
        "{} correct   {} incorrect   {:.2} sd",
        result.correct_chars,
        result.incorrect_chars,
        charting::consistency(samples)
    ))
    .alignment(Alignment::Center)
    .render(chunks[2], buf);

    if chunks[3].height >= 3 && chunks[3].width >= 10 {
        render_chart(samples, result.time_elapsed_secs, chunks[3], buf);
    }

    if let SaveStatus::Saved {
        new_personal_best: true,
    } = app.save_status()
    {
        Paragraph::new(Span::styled(
            PERSONAL_BEST_BANNER,
            bold().fg(Color::Magenta),
        ))
        .alignment(Alignment::Center)
        .render(chunks[4], buf);
    }

    Paragraph::new(save_status_line(app.save_status()))
        .alignment(Alignment::Center)
        .render(chunks[5], buf);

    Paragraph::new(Span::styled(
        "(r)estart / (l)eaderboard / (tab) new text / (esc)ape",
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .render(chunks[6], buf);
}

fn render_chart(samples: &[WpmSample], elapsed_secs: f64, area: Rect, buf: &mut Buffer) {
    let (overall_duration, highest_wpm) =
        charting::compute_chart_params(samples, Some(elapsed_secs));
    let points = charting::chart_points(samples);
    let datasets = vec![Dataset::default()
        .marker(ratatui::symbols::Marker::Braille)
        .style(Style::default().fg(Color::Magenta))
        .graph_type(GraphType::Line)
        .data(&points)];

    Chart::new(datasets)
        .x_axis(
            Axis::default()
                .title("seconds")
                .bounds([0.0, overall_duration])
                .labels(vec![
                    Span::styled("0", bold()),
                    Span::styled(charting::format_label(overall_duration), bold()),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("wpm")
                .bounds([0.0, highest_wpm])
                .labels(vec![
                    Span::styled("0", bold()),
                    Span::styled(charting::format_label(highest_wpm), bold()),
                ]),
        )
        .render(area, buf);
}

/// Render celebration particles on top of the results screen
fn render_celebration_particles(celebration: &CelebrationAnimation, area: Rect, buf: &mut Buffer) {
    let colors = [
        Color::Yellow,
        Color::Magenta,
        Color::Cyan,
        Color::Green,
        Color::Red,
        Color::Blue,
        Color::LightYellow,
    ];

    for particle in &celebration.particles {
        if particle.x < 0.0 || particle.y < 0.0 {
            continue;
        }
        let (x, y) = (particle.x as u16, particle.y as u16);
        if x >= area.width || y >= area.height {
            continue;
        }

        let color = colors[particle.color_index % colors.len()];
        let alpha = particle.brightness();
        let style = match (particle.is_letter(), alpha) {
            (true, a) if a > 0.4 => Style::default().fg(color).add_modifier(Modifier::BOLD),
            (true, _) => Style::default().fg(color),
            (false, a) if a > 0.7 => Style::default().fg(color).add_modifier(Modifier::BOLD),
            (false, a) if a > 0.3 => Style::default().fg(color),
            (false, _) => Style::default().fg(color).add_modifier(Modifier::DIM),
        };

        if let Some(cell) = buf.cell_mut((area.x + x, area.y + y)) {
            cell.set_symbol(&particle.symbol.to_string());
            cell.set_style(style);
        }
    }
}
