//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use cvwizard_core::{ActionRunner, FormModel, JobId, JobResults, Request, Severity, Wizard};
use cvwizard_gateway::{DownloadTarget, FileDownloader, Gateway};
use cvwizard_shared::{
    AppConfig, CandidateId, GatewayConfig, JobPosting, KNOWN_STYLES, SubmissionPayload,
    init_config, load_config,
};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// cvwizard: build, save and use your résumé from the terminal.
#[derive(Parser)]
#[command(
    name = "cvwizard",
    version,
    about = "Save résumé drafts, generate summaries, search and apply to jobs.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Backend base URL (overrides the config file).
    #[arg(long, env = "CVWIZARD_BACKEND", global = true)]
    pub backend: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Save a résumé draft and print the new candidate ID.
    Submit {
        /// JSON draft with the submission payload shape.
        draft: PathBuf,
    },

    /// Generate summary suggestions for a draft.
    Summary {
        /// JSON draft with the submission payload shape.
        draft: PathBuf,
    },

    /// Search job postings.
    Search {
        /// Search terms.
        query: String,

        /// Location filter (defaults to the configured location).
        #[arg(short, long)]
        location: Option<String>,
    },

    /// Apply to a job and download the résumé.
    Apply {
        /// Candidate ID returned by `submit`.
        #[arg(long)]
        candidate: String,

        /// JSON file holding one job posting, as printed by `search`.
        #[arg(long)]
        job: PathBuf,

        /// Document style for the download.
        #[arg(long)]
        style: Option<String>,
    },

    /// Download the résumé document.
    Download {
        /// Candidate ID returned by `submit`.
        #[arg(long)]
        candidate: String,

        /// Document style: classic, modern or uno.
        #[arg(long)]
        style: Option<String>,
    },

    /// Launch the interactive wizard.
    Tui,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "cvwizard=warn",
        1 => "cvwizard=info",
        2 => "cvwizard=debug",
        _ => "cvwizard=trace",
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let backend = cli.backend.clone();
    match cli.command {
        Command::Submit { draft } => cmd_submit(backend, &draft).await,
        Command::Summary { draft } => cmd_summary(backend, &draft).await,
        Command::Search { query, location } => {
            cmd_search(backend, &query, location.as_deref()).await
        }
        Command::Apply {
            candidate,
            job,
            style,
        } => cmd_apply(backend, &candidate, &job, style.as_deref()).await,
        Command::Download { candidate, style } => {
            cmd_download(backend, &candidate, style.as_deref()).await
        }
        Command::Tui => cmd_tui().await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

// ---------------------------------------------------------------------------
// Session setup
// ---------------------------------------------------------------------------

/// Everything a command needs to talk to the backend.
struct Session {
    config: AppConfig,
    wizard: Wizard,
    runner: ActionRunner,
    downloader: FileDownloader,
}

impl Session {
    fn open(backend: Option<String>) -> Result<Self> {
        let config = load_config()?;
        let mut gateway_config = GatewayConfig::from(&config);
        if let Some(url) = backend {
            gateway_config = gateway_config.with_base_url(url);
        }

        let gateway = Gateway::new(&gateway_config)?;
        let downloader = FileDownloader::new(
            gateway.client().clone(),
            config.download.resolved_output_dir()?,
        );
        let runner = ActionRunner::new(gateway, std::sync::Arc::new(downloader.clone()));
        let wizard = Wizard::new(FormModel::default(), config.download.default_style.clone());

        Ok(Self {
            config,
            wizard,
            runner,
            downloader,
        })
    }

    /// Run `request` and its follow-ups. Downloads are awaited so the
    /// process does not exit before the file is written.
    async fn drive(&mut self, request: Request) -> Result<Option<PathBuf>> {
        let mut pending = Some(request);
        let mut saved = None;
        while let Some(request) = pending.take() {
            match request {
                Request::Download {
                    candidate_id,
                    style,
                } => {
                    let url = self.runner.gateway().download_url(&candidate_id, &style)?;
                    let target = DownloadTarget {
                        url,
                        candidate_id,
                        style,
                    };
                    let spinner = CliProgress::new("Descargando CV...");
                    let path = self.downloader.fetch(&target).await;
                    spinner.finish();
                    saved = Some(path?);
                }
                other => {
                    let spinner = CliProgress::new(progress_label(&other));
                    let outcome = self.runner.run(other).await;
                    spinner.finish();
                    if let Some(outcome) = outcome {
                        pending = self.wizard.apply_outcome(outcome);
                    }
                }
            }
        }
        Ok(saved)
    }

    /// Turn a raised alert or an error status into a command failure.
    fn check(&self) -> Result<()> {
        let presenter = self.wizard.presenter();
        if let Some(alert) = presenter.alert() {
            return Err(eyre!("{alert}"));
        }
        match presenter.status() {
            Some(status) if status.severity == Severity::Error => Err(eyre!("{}", status.text)),
            _ => Ok(()),
        }
    }

    fn print_status(&self) {
        if let Some(status) = self.wizard.presenter().status() {
            println!("  {}", status.text);
        }
    }
}

fn progress_label(request: &Request) -> &'static str {
    match request {
        Request::Submit(_) => "Guardando...",
        Request::GenerateSummary(_) => "Generando resúmenes...",
        Request::SearchJobs { .. } => "Buscando ofertas...",
        Request::Apply { .. } => "Postulando...",
        Request::Download { .. } => "Descargando CV...",
    }
}

fn read_draft(path: &Path) -> Result<SubmissionPayload> {
    let content = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("cannot read draft '{}'", path.display()))?;
    serde_json::from_str(&content)
        .wrap_err_with(|| format!("'{}' is not a valid résumé draft", path.display()))
}

fn read_job(path: &Path) -> Result<JobPosting> {
    let content = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("cannot read job '{}'", path.display()))?;
    serde_json::from_str(&content)
        .wrap_err_with(|| format!("'{}' is not a valid job posting", path.display()))
}

fn resolve_style(requested: Option<&str>, config: &AppConfig) -> String {
    let style = requested.unwrap_or(config.download.default_style.as_str());
    if !KNOWN_STYLES.contains(&style) {
        warn!(style, "style not known to the backend, passing it through");
    }
    style.to_string()
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// Spinner shown while a request is in flight.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new(message: &str) -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }

    fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_submit(backend: Option<String>, draft: &Path) -> Result<()> {
    let payload = read_draft(draft)?;
    let mut session = Session::open(backend)?;
    session.wizard.load_draft(&payload);

    info!(draft = %draft.display(), "submitting draft");
    let request = session.wizard.submit();
    session.drive(request).await?;
    session.check()?;

    println!();
    session.print_status();
    if let Some(id) = session.wizard.candidate_id() {
        println!("  Candidate: {id}");
    }
    println!();
    Ok(())
}

async fn cmd_summary(backend: Option<String>, draft: &Path) -> Result<()> {
    let payload = read_draft(draft)?;
    let mut session = Session::open(backend)?;
    session.wizard.load_draft(&payload);

    let request = session.wizard.generate_summary();
    session.drive(request).await?;
    session.check()?;

    println!();
    match session.wizard.presenter().summary_options() {
        Some(options) if !options.is_empty() => {
            for (i, option) in options.iter().enumerate() {
                println!("  {}. {option}", i + 1);
                println!();
            }
        }
        _ => println!("  (sin sugerencias)"),
    }
    Ok(())
}

async fn cmd_search(backend: Option<String>, query: &str, location: Option<&str>) -> Result<()> {
    let mut session = Session::open(backend)?;
    let location = location
        .map(str::to_string)
        .unwrap_or_else(|| session.config.search.default_location.clone());

    let request = session.wizard.search_jobs(query, &location);
    session.drive(request).await?;
    session.check()?;

    println!();
    match session.wizard.presenter().jobs() {
        JobResults::Cards(cards) => {
            for card in cards {
                let job = &card.job;
                println!("  [{}] {}", card.id.0, job.display_title());
                println!(
                    "      {} · {} · {}",
                    job.company.as_deref().unwrap_or("-"),
                    job.location.as_deref().unwrap_or("-"),
                    job.date_posted.as_deref().unwrap_or("-"),
                );
                if let Some(url) = &job.url {
                    println!("      {url}");
                }
                println!("      {}", serde_json::to_string(job)?);
            }
        }
        _ => session.print_status(),
    }
    println!();
    Ok(())
}

async fn cmd_apply(
    backend: Option<String>,
    candidate: &str,
    job_file: &Path,
    style: Option<&str>,
) -> Result<()> {
    let job = read_job(job_file)?;
    let mut session = Session::open(backend)?;
    let style = resolve_style(style, &session.config);
    session.wizard.select_style(style);
    session.wizard.adopt_candidate(CandidateId::new(candidate));

    // Present the job as the only card so the wizard's apply path is used.
    session
        .wizard
        .apply_outcome(cvwizard_core::Outcome::JobsFound(Ok(vec![job])));
    let request = session
        .wizard
        .apply_to_job(JobId(0))
        .ok_or_else(|| eyre!("could not prepare application"))?;

    let saved = session.drive(request).await?;
    session.check()?;

    println!();
    session.print_status();
    if let Some(path) = saved {
        println!("  Saved: {}", path.display());
    }
    println!();
    Ok(())
}

async fn cmd_download(backend: Option<String>, candidate: &str, style: Option<&str>) -> Result<()> {
    let mut session = Session::open(backend)?;
    let style = resolve_style(style, &session.config);
    session.wizard.select_style(style);
    session.wizard.adopt_candidate(CandidateId::new(candidate));

    let request = session
        .wizard
        .download()
        .ok_or_else(|| eyre!("no candidate to download"))?;
    let saved = session.drive(request).await?;

    if let Some(path) = saved {
        println!("Saved: {}", path.display());
    }
    Ok(())
}

async fn cmd_tui() -> Result<()> {
    info!("launching TUI");
    let status = std::process::Command::new("cvwizard-tui")
        .stdin(std::process::Stdio::inherit())
        .stdout(std::process::Stdio::inherit())
        .stderr(std::process::Stdio::inherit())
        .status()
        .map_err(|e| eyre!("failed to launch cvwizard-tui (is it on PATH?): {e}"))?;

    if !status.success() {
        return Err(eyre!(
            "cvwizard-tui exited with status: {}",
            status.code().unwrap_or(-1)
        ));
    }
    Ok(())
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_search_with_location() {
        let cli = Cli::try_parse_from(["cvwizard", "search", "rust developer", "-l", "Lima"])
            .expect("parse");
        match cli.command {
            Command::Search { query, location } => {
                assert_eq!(query, "rust developer");
                assert_eq!(location.as_deref(), Some("Lima"));
            }
            _ => panic!("expected search"),
        }
    }

    #[test]
    fn cli_backend_flag_is_global() {
        let cli = Cli::try_parse_from([
            "cvwizard",
            "download",
            "--candidate",
            "7",
            "--backend",
            "http://localhost:8000",
        ])
        .expect("parse");
        assert_eq!(cli.backend.as_deref(), Some("http://localhost:8000"));
    }

    #[test]
    fn draft_file_loads_into_payload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("draft.json");
        std::fs::write(
            &path,
            r#"{"full_name": "Ana", "email": "ana@example.com",
                "skills": [{"name": "Rust", "level": "Avanzado"}]}"#,
        )
        .unwrap();

        let payload = read_draft(&path).unwrap();
        assert_eq!(payload.main["full_name"], "Ana");
        assert_eq!(payload.skills.len(), 1);
        assert!(payload.experiences.is_empty());
    }

    #[test]
    fn unknown_style_passes_through() {
        let config = AppConfig::default();
        assert_eq!(resolve_style(None, &config), "classic");
        assert_eq!(resolve_style(Some("retro"), &config), "retro");
    }
}
