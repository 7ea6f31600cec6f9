use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use legend_engine::{Answered, DecisionTree, GuessReply, SessionRequest};
use serde::Serialize;
use std::env;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;

mod app;
mod http_api;

pub use app::{player_records, AppContext, PlayerRecord};

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    print_stdout(&text)
}

#[derive(Parser)]
#[command(name = "legend")]
#[command(about = "Guess the basketball player you are thinking of", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(long, global = true)]
    quiet: bool,

    /// Engine config file (JSON or TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Roster CSV (default: searched for under the current directory)
    #[arg(long, global = true)]
    data: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the roster as JSON
    Players(OutputArgs),

    /// Print the next question for a transcript
    Ask(SessionArgs),

    /// Print the best guess for a transcript
    Guess(SessionArgs),

    /// Train the question tree and summarise it
    Tree(TreeArgs),

    /// Serve the game over HTTP
    Serve(ServeArgs),
}

#[derive(Args)]
struct OutputArgs {
    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Args)]
struct SessionArgs {
    /// Answered questions as a JSON array of {"question", "answer"}; `-` reads stdin
    #[arg(long, conflicts_with = "file")]
    asked: Option<String>,

    /// Path to a file containing the answered questions
    #[arg(long)]
    file: Option<PathBuf>,

    /// Restrict the roster to these ids
    #[arg(long, value_delimiter = ',')]
    ids: Vec<String>,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args)]
struct TreeArgs {
    /// Print the full tree as JSON instead of a summary
    #[arg(long)]
    json: bool,

    /// Override the configured depth budget
    #[arg(long)]
    max_depth: Option<usize>,
}

#[derive(Args)]
struct ServeArgs {
    /// Bind address, e.g. 127.0.0.1:8000
    #[arg(long, default_value = "127.0.0.1:8000")]
    bind: String,
}

pub async fn main_entry() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let root = env::current_dir().context("Failed to resolve current directory")?;
    let context = AppContext::resolve(&root, cli.config.as_deref(), cli.data.as_deref())?;

    match cli.command {
        Commands::Players(args) => run_players(&context, &args)?,
        Commands::Ask(args) => run_ask(&context, &args)?,
        Commands::Guess(args) => run_guess(&context, &args)?,
        Commands::Tree(args) => run_tree(&context, &args)?,
        Commands::Serve(args) => serve_http(context, args).await?,
    }

    Ok(())
}

fn read_transcript(args: &SessionArgs) -> Result<Vec<Answered>> {
    let raw = match (&args.asked, &args.file) {
        (Some(raw), _) if raw == "-" => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read transcript from stdin")?;
            buffer
        }
        (Some(raw), _) => raw.clone(),
        (None, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read transcript from {}", path.display()))?,
        (None, None) => return Ok(Vec::new()),
    };
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&raw)
        .context("Transcript must be a JSON array of {\"question\", \"answer\"}")
}

fn session_request(args: &SessionArgs) -> Result<SessionRequest> {
    let ids: Vec<String> = args
        .ids
        .iter()
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .collect();
    Ok(SessionRequest {
        asked: read_transcript(args)?,
        candidate_ids: (!ids.is_empty()).then_some(ids),
    })
}

fn run_players(context: &AppContext, args: &OutputArgs) -> Result<()> {
    let roster = context.load()?;
    print_json(&player_records(&roster.candidates), args.pretty)
}

fn run_ask(context: &AppContext, args: &SessionArgs) -> Result<()> {
    let request = session_request(args)?;
    let roster = context.load()?;
    let tree = context.train(&roster.candidates);
    let next = context
        .session()
        .next_question(&roster.candidates, &request, tree.as_ref())?;
    print_json(&next, args.output.pretty)
}

fn run_guess(context: &AppContext, args: &SessionArgs) -> Result<()> {
    let request = session_request(args)?;
    let roster = context.load()?;
    let tree = context.train(&roster.candidates);
    let guess = context
        .session()
        .guess(&roster.candidates, &request, tree.as_ref())?;
    print_json(&GuessReply::from(guess), args.output.pretty)
}

fn run_tree(context: &AppContext, args: &TreeArgs) -> Result<()> {
    let roster = context.load()?;
    let mut config = context.config.clone();
    if let Some(depth) = args.max_depth {
        config.max_depth = depth;
    }
    let tree = DecisionTree::train(&roster.candidates, &config);
    if args.json {
        return print_json(&tree, true);
    }

    let stats = tree.stats();
    print_stdout(&format!("players: {}", roster.candidates.len()))?;
    print_stdout(&format!("branches: {}", stats.branches))?;
    print_stdout(&format!("leaves: {}", stats.leaves))?;
    print_stdout(&format!("depth: {}", stats.depth))?;
    print_stdout(&format!("largest leaf: {}", stats.largest_leaf))?;
    Ok(())
}

async fn serve_http(context: AppContext, args: ServeArgs) -> Result<()> {
    let roster = context.load()?;
    let state = Arc::new(http_api::HttpState::new(context, roster.candidates));
    let app = http_api::router(state);

    let listener = tokio::net::TcpListener::bind(&args.bind)
        .await
        .with_context(|| format!("Failed to bind {}", args.bind))?;
    let local_addr = listener.local_addr()?;
    let base_url = format!("http://{local_addr}");

    log::info!("Serving on {base_url}");
    print_stdout(&format!("Health endpoint: {base_url}/health"))?;
    print_stdout(&format!(
        "Try: curl -X POST {base_url}/next-question -H 'Content-Type: application/json' -d '{{\"asked\": []}}'"
    ))?;
    axum::serve(listener, app).await?;
    Ok(())
}
