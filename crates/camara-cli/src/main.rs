use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use camara_acquire::config::DEFAULT_API_BASE;
use camara_acquire::web_history::{self, RECENT_LIMIT};
use camara_acquire::{
    compose, AnyResolver, ApiConfig, CamaraClient, ConsultaError, DirectResolver, ProxyResolver,
    Resolution,
};
use camara_model::{Identifier, Section};
use camara_render::{ConsultaWidget, HtmlBuffer};
use clap::{Args, Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

#[derive(Parser)]
#[command(name = "camara")]
#[command(about = "Look up bills (proposições) in the Câmara dos Deputados open-data API")]
#[command(version)]
struct Cli {
    /// Log level: error, warn, info, debug, trace
    #[arg(long, global = true, default_value = "warn", value_enum)]
    log_level: LogLevel,

    /// Use UTC timestamps instead of local time
    #[arg(long, global = true)]
    utc: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up one proposition and render the result
    Consulta {
        /// Identifier, e.g. "PL 2306/2020"
        #[arg(num_args = 0..)]
        input: Vec<String>,

        #[command(flatten)]
        query: QueryArgs,

        /// Write the rendered result to this file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Show the latest movements from the public tracking page
    Historico {
        /// Identifier, e.g. "PL 2306/2020"
        #[arg(num_args = 1..)]
        input: Vec<String>,

        /// How many movements to show
        #[arg(short, long, default_value_t = RECENT_LIMIT)]
        limit: usize,

        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        #[command(flatten)]
        api: ApiArgs,
    },

    /// Read identifiers from stdin, one per line; "sair" quits
    Interativo {
        #[command(flatten)]
        query: QueryArgs,
    },

    /// Run the /consulta backend used by proxy mode
    Serve {
        /// Address to listen on
        #[arg(long, env = "CAMARA_BIND", default_value = "0.0.0.0:8000")]
        bind: SocketAddr,

        #[command(flatten)]
        api: ApiArgs,
    },
}

#[derive(Args)]
struct ApiArgs {
    /// Open-data API root
    #[arg(long, env = "CAMARA_API_URL", default_value = DEFAULT_API_BASE)]
    api_url: String,

    /// Per-request timeout in seconds (none by default)
    #[arg(long)]
    timeout: Option<u64>,
}

impl ApiArgs {
    fn client(&self) -> Result<CamaraClient> {
        let config = ApiConfig::default()
            .with_api_base(&self.api_url)
            .with_timeout(self.timeout.map(Duration::from_secs));
        CamaraClient::new(config).context("building API client")
    }
}

#[derive(Args)]
struct QueryArgs {
    /// Query the API directly, or go through a /consulta backend
    #[arg(short, long, value_enum, default_value = "direct")]
    mode: Mode,

    /// Root of the /consulta backend for proxy mode
    #[arg(long, env = "CAMARA_PROXY_URL", default_value = "http://127.0.0.1:8000")]
    proxy_url: String,

    #[arg(short, long, value_enum, default_value = "html")]
    format: OutputFormat,

    #[command(flatten)]
    api: ApiArgs,
}

impl QueryArgs {
    fn resolver(&self) -> Result<AnyResolver> {
        Ok(match self.mode {
            Mode::Direct => AnyResolver::Direct(DirectResolver::new(self.api.client()?)),
            Mode::Proxy => AnyResolver::Proxy(
                ProxyResolver::new(&self.proxy_url).context("building proxy client")?,
            ),
        })
    }
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum Mode {
    /// dadosabertos.camara.leg.br, search then details + history
    Direct,
    /// GET {proxy-url}/consulta/{identifier}
    Proxy,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Html,
    Text,
    Json,
}

const PROMPT: &str = "\nProposição (ou 'sair'): ";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Map log level, suppressing noisy HTML-parsing crates at debug/trace
    let level = match cli.log_level {
        LogLevel::Error => "error",
        LogLevel::Warn  => "warn",
        LogLevel::Info  => "info",
        LogLevel::Debug => "debug,selectors=warn,html5ever=warn",
        LogLevel::Trace => "trace,selectors=warn,html5ever=warn",
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // Timestamp format: 2026-02-14 19:44:09.123 -08:00
    let time_format = "%Y-%m-%d %H:%M:%S%.3f %:z";

    // Logs go to stderr; stdout carries the rendered result.
    if cli.utc {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_timer(tracing_subscriber::fmt::time::ChronoUtc::new(time_format.to_string()))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_timer(tracing_subscriber::fmt::time::ChronoLocal::new(time_format.to_string()))
            .init();
    }

    match cli.command {
        Commands::Consulta {
            input,
            query,
            output,
        } => {
            let input = input.join(" ");
            tracing::info!(input = %input, "Consulting");
            let mut widget = ConsultaWidget::new(query.resolver()?, HtmlBuffer::default());
            let outcome = widget.submit(&input).await;
            let rendered = present(&outcome, &widget.container().html, query.format)?;

            match output {
                Some(path) => {
                    std::fs::write(&path, &rendered)
                        .with_context(|| format!("writing {path}"))?;
                    tracing::info!(path = %path, bytes = rendered.len(), "Wrote result");
                }
                None => print!("{rendered}"),
            }

            outcome?;
        }
        Commands::Historico {
            input,
            limit,
            format,
            api,
        } => {
            let input = input.join(" ");
            let id = Identifier::parse(&input)?;
            let client = api.client()?;

            let tipo = id.tipo_or_default();
            let hit = client
                .search(tipo, &id.numero, &id.ano)
                .await?
                .into_iter()
                .next()
                .ok_or_else(|| ConsultaError::NotFound(id.label()))?;
            tracing::info!(id = hit.id, label = %hit.label(), "Found proposition");

            let movements = web_history::fetch(&client, hit.id).await?;
            let recent = &movements[..movements.len().min(limit)];

            if recent.is_empty() {
                tracing::warn!(id = hit.id, "Tracking page has no movement table");
            }

            let mut sections = vec![Section::title(hit.label())];
            sections.extend(web_history::history_sections(recent, limit));

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(recent)?),
                OutputFormat::Html => println!("{}", camara_render::render_sections(&sections)),
                OutputFormat::Text => print!("{}", camara_render::text::sections_text(&sections)),
            }
        }
        Commands::Interativo { query } => {
            let mut widget = ConsultaWidget::new(query.resolver()?, HtmlBuffer::default());
            let mut stdout = tokio::io::stdout();
            let mut lines = BufReader::new(tokio::io::stdin()).lines();

            let banner = camara_render::text::sections_text(&compose::help_sections());
            stdout.write_all(banner.as_bytes()).await?;

            loop {
                stdout.write_all(PROMPT.as_bytes()).await?;
                stdout.flush().await?;

                let Some(line) = lines.next_line().await? else {
                    break;
                };
                let line = line.trim();
                if line.eq_ignore_ascii_case("sair") {
                    break;
                }
                if line.is_empty() {
                    continue;
                }

                let outcome = widget.submit(line).await;
                let rendered = present(&outcome, &widget.container().html, query.format)?;
                stdout.write_all(rendered.as_bytes()).await?;
            }
        }
        Commands::Serve { bind, api } => {
            let client = api.client()?;
            tracing::info!(api = %client.config().api_base, "Starting /consulta backend");
            camara_server::serve(bind, client)
                .await
                .with_context(|| format!("serving on {bind}"))?;
        }
    }

    Ok(())
}

/// The result as the chosen format. Failures are rendered too, so the
/// caller always has something to show.
fn present(
    outcome: &std::result::Result<Resolution, ConsultaError>,
    html: &str,
    format: OutputFormat,
) -> Result<String> {
    Ok(match format {
        OutputFormat::Html => format!("{html}\n"),
        OutputFormat::Text => match outcome {
            Ok(resolution) => camara_render::render_text(resolution),
            Err(e) => format!("{e}\n"),
        },
        OutputFormat::Json => {
            let value = match outcome {
                Ok(resolution) => serde_json::to_value(resolution)?,
                Err(e) => serde_json::json!({"kind": "error", "message": e.to_string()}),
            };
            format!("{}\n", serde_json::to_string_pretty(&value)?)
        }
    })
}
