use crate::app::AppState;
use crate::menu::MenuItem;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

pub fn render(f: &mut Frame, area: Rect, state: &AppState) {
    let items = state.items();

    if items.is_empty() {
        let para = Paragraph::new("Empty menu")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::NONE));
        f.render_widget(para, area);
        return;
    }

    // Calculate visible window (scroll)
    let visible_height = area.height as usize;
    let scroll_offset = if state.cursor >= visible_height {
        state.cursor - visible_height + 1
    } else {
        0
    };

    let key_width = items
        .iter()
        .map(|i| UnicodeWidthStr::width(i.key()))
        .max()
        .unwrap_or(1);
    let inner_width = area.width.saturating_sub(2) as usize;

    let lines: Vec<Line> = items
        .iter()
        .enumerate()
        .skip(scroll_offset)
        .take(visible_height)
        .map(|(i, item)| {
            render_item_line(item, i == state.cursor, &state.pending, key_width, inner_width)
        })
        .collect();

    let list = Paragraph::new(lines).block(Block::default().borders(Borders::NONE));
    f.render_widget(list, area);
}

fn render_item_line(
    item: &MenuItem,
    is_selected: bool,
    pending: &str,
    key_width: usize,
    max_width: usize,
) -> Line<'static> {
    let key = item.key();
    let key_pad = " ".repeat(key_width.saturating_sub(UnicodeWidthStr::width(key)));
    let marker = if item.is_menu() { " ›" } else { "" };

    let prefix_width = 1 + key_width + 2;
    let label_max = max_width.saturating_sub(prefix_width + UnicodeWidthStr::width(marker));
    let label = truncate(item.label(), label_max);

    let select_style = if is_selected {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    };

    // highlight the typed part of a multi-character key
    let mut spans = vec![Span::raw(" ")];
    if !pending.is_empty() && key.starts_with(pending) {
        spans.push(Span::styled(
            pending.to_string(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(
            key[pending.len()..].to_string(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));
    } else {
        spans.push(Span::styled(
            key.to_string(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));
    }
    spans.push(Span::raw(format!("{key_pad}  ")));
    spans.push(Span::styled(label, select_style));
    if !marker.is_empty() {
        spans.push(Span::styled(marker, Style::default().fg(Color::DarkGray)));
    }

    Line::from(spans)
}

pub fn truncate(s: &str, max_width: usize) -> String {
    if max_width == 0 {
        String::new()
    } else if UnicodeWidthStr::width(s) <= max_width {
        s.to_string()
    } else {
        let mut result = String::new();
        let mut width = 0;
        for c in s.chars() {
            let cw = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
            if width + cw + 1 > max_width {
                result.push('…');
                break;
            }
            result.push(c);
            width += cw;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_untouched() {
        assert_eq!(truncate("bundle update", 20), "bundle update");
    }

    #[test]
    fn long_text_gets_ellipsis() {
        let t = truncate("bundle exec jekyll serve --trace", 10);
        assert!(t.ends_with('…'));
        assert!(UnicodeWidthStr::width(t.as_str()) <= 10);
    }

    #[test]
    fn wide_chars_counted_by_width() {
        let t = truncate("日本語のメニュー", 7);
        assert!(UnicodeWidthStr::width(t.as_str()) <= 7);
    }

    #[test]
    fn zero_width_is_empty() {
        assert_eq!(truncate("bundle update", 0), "");
        assert_eq!(truncate("", 0), "");
    }

    #[test]
    fn submenu_label_fits_beside_marker() {
        let item = MenuItem::submenu("t", Some("tools"), Vec::new()).unwrap();
        // " t  " plus "tools" plus " ›" is exactly 11 columns wide
        let line = render_item_line(&item, false, "", 1, 11);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, " t  tools ›");
    }

    #[test]
    fn line_shows_key_and_label() {
        let item = MenuItem::leaf("u", Some("update GitHub Pages gem"), "bundle update").unwrap();
        let line = render_item_line(&item, false, "", 1, 80);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, " u  update GitHub Pages gem");
    }

    #[test]
    fn submenu_line_has_marker() {
        let item = MenuItem::submenu("t", Some("tools"), Vec::new()).unwrap();
        let line = render_item_line(&item, true, "", 1, 80);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, " t  tools ›");
    }

    #[test]
    fn pending_prefix_split_out() {
        let item = MenuItem::leaf("gs", Some("git status"), "git status").unwrap();
        let line = render_item_line(&item, false, "g", 2, 80);
        assert_eq!(line.spans[1].content, "g");
        assert_eq!(line.spans[2].content, "s");
    }
}
