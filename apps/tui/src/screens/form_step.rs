//! Steps 1–4: main fields and repeatable section items.

use cvwizard_core::{StepLayout, Wizard};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use super::{Focus, field_label};

fn field_line<'a>(label: &str, value: &'a str, focused: bool, editing: bool) -> Line<'a> {
    let style = if focused && editing {
        Style::default().fg(Color::Yellow)
    } else if focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let marker = if focused { "▸ " } else { "  " };
    let cursor = if focused && editing { "▏" } else { "" };
    Line::from(vec![
        Span::styled(format!("{marker}{label:<20} "), style),
        Span::raw(value),
        Span::styled(cursor, style),
    ])
}

pub(crate) fn draw(
    f: &mut Frame,
    area: Rect,
    wizard: &Wizard,
    layout: &StepLayout,
    focus: Option<&Focus>,
    editing: bool,
) {
    let mut lines: Vec<Line> = Vec::new();
    let mut focused_line = 0usize;

    for key in layout.main_fields {
        let focused = focus == Some(&Focus::Main(*key));
        if focused {
            focused_line = lines.len();
        }
        let value = wizard.form().main.get(key).unwrap_or_default();
        lines.push(field_line(field_label(key), value, focused, editing));
    }

    if layout.summary {
        let hint = if wizard.presenter().summary_busy() {
            "  Generando resúmenes..."
        } else {
            "  g: generar resumen con IA"
        };
        lines.push(Line::from(hint).style(Style::default().fg(Color::DarkGray)));
    }

    for section in layout.sections {
        let items = wizard.form().sections.items(*section);
        lines.push(Line::from(""));
        lines.push(
            Line::from(format!("{} ({})", section.title(), items.len()))
                .style(Style::default().add_modifier(Modifier::BOLD)),
        );
        for (n, item) in items.iter().enumerate() {
            lines.push(
                Line::from(format!("  #{}", n + 1)).style(Style::default().fg(Color::DarkGray)),
            );
            for (key, value) in item.fields() {
                let focused = matches!(
                    focus,
                    Some(Focus::Item { section: s, id, key: k })
                        if s == section && *id == item.id() && k == key
                );
                if focused {
                    focused_line = lines.len();
                }
                lines.push(field_line(field_label(key), value, focused, editing));
            }
        }
    }

    let inner_height = area.height.saturating_sub(2) as usize;
    let scroll = focused_line.saturating_sub(inner_height.saturating_sub(2));

    let body = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", layout.title)),
        )
        .wrap(Wrap { trim: false })
        .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0));
    f.render_widget(body, area);
}
