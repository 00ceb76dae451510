//! Step 6: template selection and download.

use cvwizard_core::Wizard;
use cvwizard_shared::KNOWN_STYLES;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

/// Style after `current` in the known list, wrapping around.
pub(crate) fn cycle_style(current: &str, forward: bool) -> &'static str {
    let len = KNOWN_STYLES.len();
    let idx = KNOWN_STYLES.iter().position(|s| *s == current);
    let next = match (idx, forward) {
        (Some(i), true) => (i + 1) % len,
        (Some(i), false) => (i + len - 1) % len,
        (None, _) => 0,
    };
    KNOWN_STYLES[next]
}

pub(crate) fn draw(f: &mut Frame, area: Rect, wizard: &Wizard) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(5), // Styles
            Constraint::Length(3), // Candidate
            Constraint::Min(1),    // Hint
        ])
        .split(area);

    let spans: Vec<Span> = KNOWN_STYLES
        .iter()
        .flat_map(|style| {
            let chosen = *style == wizard.style();
            let styled = if chosen {
                Span::styled(
                    format!("[ {style} ]"),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )
            } else {
                Span::raw(format!("  {style}  "))
            };
            [styled, Span::raw("   ")]
        })
        .collect();

    let styles = Paragraph::new(vec![Line::from(""), Line::from(spans)])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Elige una plantilla "),
        );
    f.render_widget(styles, chunks[0]);

    let candidate = match wizard.candidate_id() {
        Some(id) => format!("CV guardado con ID {id}"),
        None => "Aún no has guardado tu CV.".to_string(),
    };
    f.render_widget(
        Paragraph::new(candidate).alignment(Alignment::Center),
        chunks[1],
    );

    let hint = Paragraph::new("← → cambiar plantilla · Enter descargar · Esc volver")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(hint, chunks[2]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn styles_cycle_both_ways() {
        assert_eq!(cycle_style("classic", true), "modern");
        assert_eq!(cycle_style("uno", true), "classic");
        assert_eq!(cycle_style("classic", false), "uno");
        assert_eq!(cycle_style("custom", true), "classic");
    }
}
