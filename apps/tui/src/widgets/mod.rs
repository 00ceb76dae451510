//! Reusable TUI widgets.

use cvwizard_core::{Severity, StatusMessage};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap};

/// Bottom status bar, colored by severity.
pub(crate) fn status_bar<'a>(status: Option<&'a StatusMessage>, hint: &'a str) -> Paragraph<'a> {
    let (text, fg) = match status {
        Some(msg) => (
            msg.text.as_str(),
            match msg.severity {
                Severity::Info => Color::White,
                Severity::Success => Color::Green,
                Severity::Error => Color::Red,
            },
        ),
        None => (hint, Color::White),
    };
    Paragraph::new(format!(" {text}")).style(Style::default().bg(Color::DarkGray).fg(fg))
}

/// Blocking alert box. Any key closes it.
pub(crate) fn draw_alert(f: &mut Frame, text: &str) {
    let area = centered_rect(50, 25, f.area());
    let alert = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Aviso ")
                .border_style(Style::default().fg(Color::Yellow)),
        );
    f.render_widget(Clear, area);
    f.render_widget(alert, area);
}

/// Summary option picker.
pub(crate) fn draw_summary_options(f: &mut Frame, options: &[String], selected: usize) {
    let area = centered_rect(70, 60, f.area());
    let items: Vec<ListItem> = options
        .iter()
        .enumerate()
        .map(|(i, option)| {
            let style = if i == selected {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let width = usize::from(area.width.saturating_sub(6)).max(10);
            let mut lines = vec![Line::from(format!("{}.", i + 1))];
            lines.extend(wrapped_lines(option, width));
            lines.push(Line::from(""));
            ListItem::new(lines).style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Resúmenes sugeridos · Enter elegir · Esc cerrar "),
    );
    f.render_widget(Clear, area);
    f.render_widget(list, area);
}

/// Wrap `text` to `width` display columns, breaking overlong words.
fn wrapped_lines(text: &str, width: usize) -> Vec<Line<'static>> {
    textwrap::wrap(text, width)
        .into_iter()
        .map(|line| Line::from(line.into_owned()))
        .collect()
}

/// Create a centered rectangle with percentage width and height.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use ratatui::backend::TestBackend;

    use super::*;

    #[test]
    fn long_words_are_broken_to_fit() {
        let text = "ver https://portafolio.example.com/ana-perez-ingeniera";
        let lines = wrapped_lines(text, 20);
        assert!(lines.len() > 2);
        assert!(lines.iter().all(|line| line.width() <= 20));

        let joined: String = lines.iter().map(|line| line.to_string()).collect();
        assert_eq!(joined.replace(' ', ""), text.replace(' ', ""));
    }

    #[test]
    fn summary_picker_renders_into_small_terminal() {
        let mut terminal = Terminal::new(TestBackend::new(40, 20)).unwrap();
        let options = vec!["ver https://portafolio.example.com/ana-perez-ingeniera".to_string()];
        terminal
            .draw(|f| draw_summary_options(f, &options, 0))
            .unwrap();
        let rendered: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(rendered.contains("https://"));
    }

    #[test]
    fn centered_rect_stays_inside() {
        let outer = Rect::new(0, 0, 100, 40);
        let inner = centered_rect(50, 50, outer);
        assert_eq!(inner.width, 50);
        assert_eq!(inner.height, 20);
        assert_eq!(inner.x, 25);
        assert_eq!(inner.y, 10);
    }
}
