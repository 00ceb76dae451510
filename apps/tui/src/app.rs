//! Core TUI application state and event loop.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use cvwizard_core::{ActionRunner, FormModel, JobId, Outcome, Region, Request, Wizard, step_layout};
use cvwizard_gateway::{FileDownloader, Gateway};
use cvwizard_shared::{AppConfig, GatewayConfig, TOTAL_STEPS};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Tabs};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::screens::job_search::JobSearchScreen;
use crate::screens::{Focus, focus_targets, form_step, templates};
use crate::widgets::{draw_alert, draw_summary_options, status_bar};

const IDLE_HINT: &str = "? ayuda · n/p avanzar/retroceder · q salir";

/// Application state.
pub(crate) struct App {
    pub wizard: Wizard,
    runner: ActionRunner,
    outcomes_tx: mpsc::UnboundedSender<Outcome>,
    outcomes_rx: mpsc::UnboundedReceiver<Outcome>,
    /// Index into the current step's focus targets.
    pub focus: usize,
    /// Whether keystrokes go into the focused text field.
    pub editing: bool,
    pub search: JobSearchScreen,
    /// Highlighted entry of the summary picker.
    pub summary_choice: usize,
    pub should_quit: bool,
    pub show_help: bool,
}

impl App {
    pub(crate) fn new(config: &AppConfig, runner: ActionRunner) -> Self {
        let (outcomes_tx, outcomes_rx) = mpsc::unbounded_channel();
        Self {
            wizard: Wizard::new(FormModel::default(), config.download.default_style.clone()),
            runner,
            outcomes_tx,
            outcomes_rx,
            focus: 0,
            editing: false,
            search: JobSearchScreen::new(&config.search.default_location),
            summary_choice: 0,
            should_quit: false,
            show_help: false,
        }
    }

    fn targets(&self) -> Vec<Focus> {
        focus_targets(&self.wizard)
    }

    fn focused(&self) -> Option<Focus> {
        let targets = self.targets();
        targets.get(self.focus.min(targets.len().saturating_sub(1))).cloned()
    }

    fn move_focus(&mut self, forward: bool) {
        let len = self.targets().len();
        if len == 0 {
            self.focus = 0;
            return;
        }
        let current = self.focus.min(len - 1);
        self.focus = if forward {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };
    }

    fn reset_focus(&mut self) {
        self.focus = 0;
        self.editing = false;
    }

    /// Run `request` in the background; its outcome comes back on the channel.
    fn dispatch(&self, request: Request) {
        let runner = self.runner.clone();
        let tx = self.outcomes_tx.clone();
        tokio::spawn(async move {
            if let Some(outcome) = runner.run(request).await {
                if tx.send(outcome).is_err() {
                    debug!("outcome dropped, UI already closed");
                }
            }
        });
    }

    /// Apply every finished outcome, in arrival order.
    fn drain_outcomes(&mut self) {
        while let Ok(outcome) = self.outcomes_rx.try_recv() {
            let step_before = self.wizard.region();
            if let Some(follow_up) = self.wizard.apply_outcome(outcome) {
                self.dispatch(follow_up);
            }
            if self.wizard.region() != step_before {
                self.reset_focus();
            }
        }
    }

    /// Edit the focused text target in place.
    fn edit_focused(&mut self, edit: impl FnOnce(&mut String)) {
        let Some(target) = self.focused() else {
            return;
        };
        match &target {
            Focus::Main(key) => {
                let mut value = self.wizard.form().main.get(key).unwrap_or_default().to_string();
                edit(&mut value);
                self.wizard.set_main(key, value);
            }
            Focus::Item { section, id, key } => {
                let mut value = self
                    .wizard
                    .form()
                    .sections
                    .item(*section, *id)
                    .and_then(|item| item.get(key))
                    .unwrap_or_default()
                    .to_string();
                edit(&mut value);
                self.wizard.set_item_field(*section, *id, key, value);
            }
            Focus::Query | Focus::Location => {
                if let Some(input) = self.search.input_mut(&target) {
                    edit(input);
                }
            }
            Focus::Job(_) => {}
        }
    }

    fn navigate(&mut self, moved: bool) {
        if moved {
            self.reset_focus();
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let KeyEvent { code, modifiers, .. } = key;

        if matches!(code, KeyCode::Char('c') | KeyCode::Char('q'))
            && modifiers.contains(KeyModifiers::CONTROL)
        {
            self.should_quit = true;
            return;
        }

        // A pending alert swallows the next key
        if self.wizard.presenter().alert().is_some() {
            self.wizard.dismiss_alert();
            return;
        }

        if let Some(count) = self.wizard.presenter().summary_options().map(<[String]>::len) {
            self.handle_summary_key(code, count);
            return;
        }

        if self.editing {
            self.handle_editing_key(code);
            return;
        }

        if self.show_help {
            self.show_help = false;
            return;
        }

        match code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('?') => {
                self.show_help = true;
                return;
            }
            _ => {}
        }

        match self.wizard.region() {
            Region::Templates => self.handle_templates_key(code),
            Region::Form { .. } => self.handle_form_key(code),
        }
    }

    fn handle_summary_key(&mut self, code: KeyCode, count: usize) {
        match code {
            KeyCode::Up | KeyCode::BackTab => {
                self.summary_choice = self.summary_choice.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Tab => {
                self.summary_choice = (self.summary_choice + 1).min(count.saturating_sub(1));
            }
            KeyCode::Enter => {
                self.wizard.choose_summary(self.summary_choice);
                self.summary_choice = 0;
            }
            KeyCode::Esc => {
                self.wizard.dismiss_summaries();
                self.summary_choice = 0;
            }
            _ => {}
        }
    }

    fn handle_editing_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter | KeyCode::Esc => self.editing = false,
            KeyCode::Tab => {
                self.editing = false;
                self.move_focus(true);
            }
            KeyCode::BackTab => {
                self.editing = false;
                self.move_focus(false);
            }
            KeyCode::Backspace => self.edit_focused(|value| {
                value.pop();
            }),
            KeyCode::Char(c) => self.edit_focused(|value| value.push(c)),
            _ => {}
        }
    }

    fn handle_templates_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Left => {
                let style = templates::cycle_style(self.wizard.style(), false);
                self.wizard.select_style(style);
            }
            KeyCode::Right => {
                let style = templates::cycle_style(self.wizard.style(), true);
                self.wizard.select_style(style);
            }
            KeyCode::Enter => {
                if let Some(request) = self.wizard.download() {
                    info!(style = self.wizard.style(), "download requested");
                    self.dispatch(request);
                }
            }
            KeyCode::Esc => {
                let moved = self.wizard.back_from_templates();
                self.navigate(moved);
            }
            _ => {}
        }
    }

    fn handle_form_key(&mut self, code: KeyCode) {
        let controls = self.wizard.controls();
        match code {
            KeyCode::Tab | KeyCode::Down => self.move_focus(true),
            KeyCode::BackTab | KeyCode::Up => self.move_focus(false),
            KeyCode::Enter => match self.focused() {
                Some(Focus::Job(idx)) => {
                    if let Some(request) = self.wizard.apply_to_job(JobId(idx)) {
                        self.dispatch(request);
                    }
                }
                Some(target) if target.is_text() => self.editing = true,
                _ => {}
            },
            KeyCode::Char('n') if controls.next => {
                let moved = self.wizard.next();
                self.navigate(moved);
            }
            KeyCode::Char('p') if controls.prev => {
                let moved = self.wizard.prev();
                self.navigate(moved);
            }
            KeyCode::Char('t') if controls.skip_to_templates => {
                let moved = self.wizard.skip_to_templates();
                self.navigate(moved);
            }
            KeyCode::Char('s') if controls.submit => {
                let request = self.wizard.submit();
                self.dispatch(request);
            }
            KeyCode::Char('g') => self.generate_summary(),
            KeyCode::Char('b') => self.search_jobs(),
            KeyCode::Char('a') => self.add_item(),
            KeyCode::Char('x') => self.remove_focused_item(),
            _ => {}
        }
    }

    fn current_layout(&self) -> Option<&'static cvwizard_core::StepLayout> {
        match self.wizard.region() {
            Region::Form { step } => step_layout(step),
            Region::Templates => None,
        }
    }

    fn generate_summary(&mut self) {
        let offers_summary = self.current_layout().is_some_and(|l| l.summary);
        if offers_summary && !self.wizard.presenter().summary_busy() {
            let request = self.wizard.generate_summary();
            self.dispatch(request);
        }
    }

    fn search_jobs(&mut self) {
        if self.current_layout().is_some_and(|l| l.search) {
            let request = self.wizard.search_jobs(&self.search.query, &self.search.location);
            self.dispatch(request);
        }
    }

    /// Add an item to the focused section, or the step's first section.
    fn add_item(&mut self) {
        let Some(layout) = self.current_layout() else {
            return;
        };
        let section = self
            .focused()
            .and_then(|f| f.section())
            .or_else(|| layout.sections.first().copied());
        if let Some(section) = section {
            self.wizard.add_item(section);
        }
    }

    fn remove_focused_item(&mut self) {
        if let Some(Focus::Item { section, id, .. }) = self.focused() {
            if self.wizard.remove_item(section, id) {
                let len = self.targets().len();
                self.focus = self.focus.min(len.saturating_sub(1));
            }
        }
    }
}

/// Run the wizard inside the alternate screen until the user quits.
pub(crate) fn run(config: AppConfig) -> Result<()> {
    let gateway = Gateway::new(&GatewayConfig::from(&config))?;
    let downloader = FileDownloader::new(
        gateway.client().clone(),
        config.download.resolved_output_dir()?,
    );
    let runner = ActionRunner::new(gateway, Arc::new(downloader));
    let mut app = App::new(&config, runner);

    // Setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        app.drain_outcomes();
        terminal.draw(|f| draw(f, app))?;

        // Poll for events with 100ms timeout for responsive UI
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn step_title(step: u8) -> &'static str {
    step_layout(step).map_or("Plantillas", |layout| layout.title)
}

fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Step bar
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    let step_titles: Vec<Line> = (1..=TOTAL_STEPS)
        .map(|step| Line::from(format!("{step}. {}", step_title(step))))
        .collect();

    let tabs = Tabs::new(step_titles)
        .block(Block::default().borders(Borders::ALL).title(" CV Wizard "))
        .select(usize::from(app.wizard.current_step().saturating_sub(1)))
        .style(Style::default().fg(Color::White))
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .divider(" │ ");
    f.render_widget(tabs, chunks[0]);

    let focus = app.focused();
    match app.wizard.region() {
        Region::Templates => templates::draw(f, chunks[1], &app.wizard),
        Region::Form { step } => match step_layout(step) {
            Some(layout) if layout.search => {
                app.search
                    .draw(f, chunks[1], &app.wizard, focus.as_ref(), app.editing);
            }
            Some(layout) => {
                form_step::draw(f, chunks[1], &app.wizard, layout, focus.as_ref(), app.editing);
            }
            None => {}
        },
    }

    f.render_widget(status_bar(app.wizard.presenter().status(), IDLE_HINT), chunks[2]);

    if let Some(options) = app.wizard.presenter().summary_options() {
        draw_summary_options(f, options, app.summary_choice);
    }
    if let Some(alert) = app.wizard.presenter().alert() {
        draw_alert(f, alert);
    }
    if app.show_help {
        draw_help_overlay(f, app);
    }
}

fn draw_help_overlay(f: &mut Frame, app: &App) {
    let area = crate::widgets::centered_rect(60, 70, f.area());
    let controls = app.wizard.controls();

    let mut help_text = vec![
        Line::from("Atajos").style(Style::default().add_modifier(Modifier::BOLD)),
        Line::from(""),
        Line::from("  Tab/↓ S-Tab/↑  Mover el foco"),
        Line::from("  Enter          Editar campo / postular a oferta"),
        Line::from("  n / p          Paso siguiente / anterior"),
        Line::from("  a / x          Agregar / quitar elemento"),
        Line::from("  ?              Mostrar esta ayuda"),
        Line::from("  q / Ctrl-C     Salir"),
        Line::from(""),
    ];
    if controls.submit {
        help_text.push(Line::from("  s              Guardar CV"));
        help_text.push(Line::from("  g              Generar resumen"));
    }
    if controls.skip_to_templates {
        help_text.push(Line::from("  b              Buscar ofertas"));
        help_text.push(Line::from("  t              Ir a plantillas"));
    }
    if controls.back_from_templates {
        help_text.push(Line::from("  ← / →          Cambiar plantilla"));
        help_text.push(Line::from("  Enter          Descargar PDF"));
        help_text.push(Line::from("  Esc            Volver"));
    }

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Ayuda · cualquier tecla para cerrar ")
                .style(Style::default().bg(Color::DarkGray)),
        )
        .style(Style::default().fg(Color::White).bg(Color::DarkGray));

    f.render_widget(Clear, area);
    f.render_widget(help, area);
}
