//! Step 5: job search inputs and result cards.

use cvwizard_core::{JobResults, Wizard};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};

use super::Focus;

/// Search inputs typed by the user.
pub(crate) struct JobSearchScreen {
    pub query: String,
    pub location: String,
}

impl JobSearchScreen {
    pub(crate) fn new(default_location: &str) -> Self {
        Self {
            query: String::new(),
            location: default_location.to_string(),
        }
    }

    pub(crate) fn input_mut(&mut self, focus: &Focus) -> Option<&mut String> {
        match focus {
            Focus::Query => Some(&mut self.query),
            Focus::Location => Some(&mut self.location),
            _ => None,
        }
    }

    pub(crate) fn draw(
        &self,
        f: &mut Frame,
        area: Rect,
        wizard: &Wizard,
        focus: Option<&Focus>,
        editing: bool,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Query
                Constraint::Length(3), // Location
                Constraint::Min(1),    // Results
            ])
            .split(area);

        let input_style = |target: Focus| {
            if focus == Some(&target) && editing {
                Style::default().fg(Color::Yellow)
            } else if focus == Some(&target) {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default()
            }
        };

        let query = Paragraph::new(self.query.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Puesto / palabras clave ")
                .border_style(input_style(Focus::Query)),
        );
        f.render_widget(query, chunks[0]);

        let location = Paragraph::new(self.location.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Ubicación ")
                .border_style(input_style(Focus::Location)),
        );
        f.render_widget(location, chunks[1]);

        let results_block = Block::default()
            .borders(Borders::ALL)
            .title(" Ofertas · b: buscar · Enter: postular · t: plantillas ");

        match wizard.presenter().jobs() {
            JobResults::Idle => {
                let idle = Paragraph::new("Escribe un puesto y presiona 'b' para buscar.")
                    .style(Style::default().fg(Color::DarkGray))
                    .alignment(Alignment::Center)
                    .block(results_block);
                f.render_widget(idle, chunks[2]);
            }
            JobResults::NoResults => {
                let empty = Paragraph::new(cvwizard_core::wizard::MSG_NO_RESULTS)
                    .alignment(Alignment::Center)
                    .block(results_block);
                f.render_widget(empty, chunks[2]);
            }
            JobResults::Cards(cards) => {
                let items: Vec<ListItem> = cards
                    .iter()
                    .map(|card| {
                        let selected = focus == Some(&Focus::Job(card.id.0));
                        let style = if selected {
                            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
                        } else {
                            Style::default()
                        };
                        let prefix = if selected { "▸ " } else { "  " };
                        let job = &card.job;
                        ListItem::new(vec![
                            Line::from(format!("{prefix}{}", job.display_title())),
                            Line::from(format!(
                                "    {} · {} · {}",
                                job.company.as_deref().unwrap_or("-"),
                                job.location.as_deref().unwrap_or("-"),
                                job.date_posted.as_deref().unwrap_or("-"),
                            ))
                            .style(Style::default().fg(Color::DarkGray)),
                        ])
                        .style(style)
                    })
                    .collect();
                f.render_widget(List::new(items).block(results_block), chunks[2]);
            }
        }
    }
}
