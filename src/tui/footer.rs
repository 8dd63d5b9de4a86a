use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::AppState;

pub fn render(f: &mut Frame, area: Rect, state: &AppState) {
    let narrow = area.width < crate::app::NARROW_WIDTH_THRESHOLD;
    let at_root = state.session.depth() == 0;
    let quit = if state.quit_key_free() { "q/Esc" } else { "Esc" };

    let hints: Vec<(&str, &str)> = if narrow {
        vec![("key", "run"), ("↑↓", "nav"), ("←", "back"), ("^C", "quit")]
    } else if at_root {
        vec![
            ("key", "select"),
            ("↑↓", "navigate"),
            ("Enter", "activate"),
            (quit, "quit"),
        ]
    } else {
        vec![
            ("key", "select"),
            ("↑↓", "navigate"),
            ("Enter", "activate"),
            ("←/Esc", "back"),
            ("^C", "quit"),
        ]
    };

    let line = if !state.pending.is_empty() {
        Line::from(vec![
            Span::styled("keys: ", Style::default().fg(Color::DarkGray)),
            Span::styled(state.pending.clone(), Style::default().fg(Color::Yellow)),
        ])
    } else if let Some(run) = &state.last_run {
        let color = if run.success { Color::Green } else { Color::Red };
        Line::from(vec![
            Span::styled(
                run.finished_at.format("%H:%M:%S ").to_string(),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(run.outcome.clone(), Style::default().fg(color)),
            Span::styled(format!("  {}", run.command), Style::default().fg(Color::DarkGray)),
        ])
    } else {
        let mut spans: Vec<Span> = Vec::new();
        for (i, (key, desc)) in hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(*key, Style::default().fg(Color::Cyan)));
            spans.push(Span::styled(
                format!(" {desc}"),
                Style::default().fg(Color::DarkGray),
            ));
        }
        Line::from(spans)
    };

    let footer = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(footer, area);
}
