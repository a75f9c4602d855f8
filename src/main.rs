use std::future::Future;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use safeguard::config::Config;
use safeguard::dashboard::analyzer::{Analyzer, DirectAnalyzer, ImageSource, Submission};
use safeguard::dashboard::client::RelayClient;
use safeguard::dashboard::command::{DashboardCommand, HELP};
use safeguard::dashboard::mock::MockAnalyzer;
use safeguard::dashboard::session::DashboardSession;
use safeguard::gateway::client::GatewayClient;
use safeguard::output::terminal;

/// SafeGuard: child-safety content moderation.
///
/// Sends text or images to an AI model with a fixed child-safety prompt and
/// shows the verdict: a toxicity score, flagged issues and friendly
/// explanations.
#[derive(Parser)]
#[command(name = "safeguard", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Which analyzer the client commands use.
#[derive(clap::Args, Clone, Copy)]
struct AnalyzerArgs {
    /// Use the offline keyword analyzer instead of the AI model
    #[arg(long, conflicts_with = "direct")]
    mock: bool,

    /// Call the AI gateway in-process instead of going through a relay
    #[arg(long)]
    direct: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the relay server (POST /analyze-text, POST /analyze-image)
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "8787")]
        port: u16,

        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
    },

    /// Analyze a piece of text
    AnalyzeText {
        /// The text to check
        text: String,

        #[command(flatten)]
        analyzer: AnalyzerArgs,
    },

    /// Analyze an image file or URL
    AnalyzeImage {
        /// Local image file (PNG, JPG, GIF, WebP)
        #[arg(required_unless_present = "url", conflicts_with = "url")]
        path: Option<PathBuf>,

        /// Remote image URL
        #[arg(long)]
        url: Option<String>,

        #[command(flatten)]
        analyzer: AnalyzerArgs,
    },

    /// Interactive dashboard: analyze lines of text and review flagged items
    Dashboard {
        #[command(flatten)]
        analyzer: AnalyzerArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("safeguard=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Serve { port, bind } => {
            safeguard::relay::run_server(config, port, &bind).await?;
        }

        Commands::AnalyzeText { text, analyzer } => {
            let submission = Submission::Text(text);
            if submission.is_blank() {
                anyhow::bail!("Nothing to analyze. Please enter some text to analyze.");
            }
            let analyzer = create_analyzer(&config, analyzer)?;
            let verdict = with_spinner("Analyzing text...", analyzer.analyze(&submission)).await?;
            terminal::display_verdict(&verdict);
        }

        Commands::AnalyzeImage {
            path,
            url,
            analyzer,
        } => {
            let source = match (path, url) {
                (Some(path), _) => ImageSource::from_file(&path)?,
                (None, Some(url)) => ImageSource::Url(url),
                (None, None) => anyhow::bail!("No image selected. Pass a file path or --url."),
            };
            let submission = Submission::Image(source);
            let analyzer = create_analyzer(&config, analyzer)?;
            let verdict = with_spinner("Analyzing image...", analyzer.analyze(&submission)).await?;
            terminal::display_verdict(&verdict);
        }

        Commands::Dashboard { analyzer } => {
            let analyzer = create_analyzer(&config, analyzer)?;
            run_dashboard(analyzer.as_ref()).await?;
        }
    }

    Ok(())
}

/// Pick the analyzer for the client commands.
fn create_analyzer(config: &Config, args: AnalyzerArgs) -> Result<Box<dyn Analyzer>> {
    if args.mock {
        info!("Using offline keyword analyzer");
        return Ok(Box::new(MockAnalyzer));
    }
    if args.direct {
        config.require_api_key()?;
        info!(model = %config.model, "Calling AI gateway directly");
        let gateway = GatewayClient::new(&config.gateway_url, &config.api_key)?;
        return Ok(Box::new(DirectAnalyzer::new(Arc::new(gateway), &config.model)));
    }
    info!(relay = %config.relay_url, "Using SafeGuard relay");
    Ok(Box::new(RelayClient::new(&config.relay_url)?))
}

/// Show a spinner while `fut` is outstanding.
async fn with_spinner<T>(message: &'static str, fut: impl Future<Output = T>) -> T {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("  {spinner} {msg}")
            .expect("valid template"),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    let out = fut.await;
    pb.finish_and_clear();
    out
}

/// Line-oriented dashboard over stdin. One analysis at a time; the session
/// is owned here and lives until the user quits.
async fn run_dashboard(analyzer: &dyn Analyzer) -> Result<()> {
    let mut session = DashboardSession::new();

    println!("{}", "SafeGuard: Your Safety Dashboard".bold());
    println!("Let's check in on your online safety together.\n");
    println!("{}", HELP.dimmed());
    terminal::display_meter(session.toxicity_score(), None);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("\n{} ", ">".cyan().bold());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let submission = match DashboardCommand::parse(&line) {
            DashboardCommand::AnalyzeText(text) => Submission::Text(text),
            DashboardCommand::AnalyzeImageFile(path) => match ImageSource::from_file(&path) {
                Ok(source) => Submission::Image(source),
                Err(e) => {
                    println!("  {} {e:#}", "Error:".red());
                    continue;
                }
            },
            DashboardCommand::AnalyzeImageUrl(url) => Submission::Image(ImageSource::Url(url)),
            DashboardCommand::Why(n) => {
                match session.item(n) {
                    Some(item) => terminal::display_reason(item),
                    None => println!("  No flagged item #{n}."),
                }
                continue;
            }
            DashboardCommand::List => {
                terminal::display_flagged_list(&session);
                continue;
            }
            DashboardCommand::Support => {
                terminal::display_support();
                continue;
            }
            DashboardCommand::Help => {
                println!("{}", HELP.dimmed());
                continue;
            }
            DashboardCommand::Quit => break,
            DashboardCommand::Nothing => continue,
            DashboardCommand::Unknown(input) => {
                println!("  Unknown command: {input}. Type :help for commands.");
                continue;
            }
        };

        match with_spinner("Analyzing...", session.analyze(analyzer, &submission)).await {
            Ok(summary) => {
                println!(
                    "\n  {} Found {} item(s) to review.",
                    "Analysis Complete.".bold(),
                    summary.new_items
                );
                terminal::display_meter(session.toxicity_score(), session.friendly_message());
                terminal::display_flagged_list(&session);
            }
            Err(e) => println!("  {} {e:#}", "Error:".red()),
        }
    }

    Ok(())
}
