//! Council report form service.
//!
//! Runs as an HTTP service by default; the `render` and
//! `import-entries` subcommands cover offline use without a browser
//! client in front.

mod config;
mod email;
mod http;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use forms_core::fill::{DirTemplates, FormFiller, PdftkFiller, TemplateSource};
use forms_core::mapper::map_fields;
use forms_core::report::{AuditReportRequest, Form1728Request, IndividualSurveyRequest};
use forms_core::ReportKind;

use crate::config::{Config, FileConfig};
use crate::email::EmailClient;
use crate::http::{build_router, AppState};

#[derive(Parser)]
#[command(name = "forms-server", about = "Fills council audit and survey PDF forms")]
struct Cli {
    /// Path to config.toml
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP service (the default)
    Serve {
        /// Bind address, overrides the config file
        #[arg(long)]
        listen: Option<String>,
    },
    /// Fill one template from a JSON request file
    Render {
        /// Which template to fill
        #[arg(long, value_enum)]
        report: ReportArg,
        /// JSON request body
        input: PathBuf,
        /// Where to write the filled PDF
        output: PathBuf,
    },
    /// Convert a ledger CSV export into entry JSON for audit requests
    ImportEntries {
        /// CSV export with Date, Amount, and Category columns
        csv: PathBuf,
        /// Where to write the entry JSON
        output: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ReportArg {
    Audit,
    Form1728,
    Survey,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let file_config = if cli.config.exists() {
        FileConfig::load(&cli.config)?
    } else {
        FileConfig::default()
    };

    match cli.command.unwrap_or(Command::Serve { listen: None }) {
        Command::Serve { listen } => {
            let config = Config::from_file(&file_config, listen)?;
            serve(config).await
        }
        Command::Render { report, input, output } => {
            let config = Config::from_file(&file_config, None)?;
            render(&config, report, &input, &output).await
        }
        Command::ImportEntries { csv, output } => import_entries(&csv, &output),
    }
}

async fn serve(config: Config) -> Result<()> {
    let state = AppState {
        templates: Arc::new(DirTemplates::new(config.template_dir.clone())),
        filler: Arc::new(PdftkFiller::new(config.pdftk_bin.clone())),
        email: EmailClient::from_config(config.email.as_ref()),
    };
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, templates = %config.template_dir.display(), "listening");
    axum::serve(listener, app).await.context("Server stopped")?;
    Ok(())
}

async fn render(config: &Config, report: ReportArg, input: &PathBuf, output: &PathBuf) -> Result<()> {
    let raw = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read request file: {}", input.display()))?;

    let (kind, payload) = match report {
        ReportArg::Audit => {
            let req: AuditReportRequest = serde_json::from_str(&raw).context("Invalid audit request JSON")?;
            let (period, _) = req.validate()?;
            let payload = map_fields(AuditReportRequest::scheme(period), &req.logical_values()?);
            (ReportKind::Audit, payload)
        }
        ReportArg::Form1728 => {
            let req: Form1728Request = serde_json::from_str(&raw).context("Invalid form 1728 request JSON")?;
            let payload = map_fields(Form1728Request::scheme(), &req.logical_values());
            (ReportKind::Form1728, payload)
        }
        ReportArg::Survey => {
            let req: IndividualSurveyRequest =
                serde_json::from_str(&raw).context("Invalid survey request JSON")?;
            (ReportKind::IndividualSurvey, req.field_values()?)
        }
    };

    let templates = DirTemplates::new(config.template_dir.clone());
    let filler = PdftkFiller::new(config.pdftk_bin.clone());
    let template = templates.template(kind).await?;
    let bytes = filler.fill(&template, &payload).await?;

    std::fs::write(output, &bytes)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("Wrote {} ({} fields, {} bytes)", output.display(), payload.len(), bytes.len());
    Ok(())
}

fn import_entries(csv: &PathBuf, output: &PathBuf) -> Result<()> {
    let entries = forms_core::entry::load_entries_from_csv(csv)?;
    let json = serde_json::to_string_pretty(&entries)?;
    std::fs::write(output, json)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("Imported {} entries from {}", entries.len(), csv.display());
    Ok(())
}
