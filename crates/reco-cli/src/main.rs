mod demo;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use dotenvy::dotenv;
use reco_common::api::{Domain, RecoError, RecoRequest, error_body};
use reco_common::embedding::{CascadingEmbedder, EmbeddingConfig};
use reco_common::logging::{init_tracing_subscriber, install_tracing_panic_hook};
use reco_common::matching::Ranker;
use tracing::{debug, error, info};

#[derive(Debug, Parser)]
#[command(
    name = "reco",
    about = "Rank movies or vacancies against a user profile with explanations"
)]
struct Cli {
    /// Use the TF-IDF backend only; never contact GigaChat or Ollama
    #[arg(long, global = true)]
    force_tfidf: bool,

    /// Log which embedding backend answered and why others were skipped
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Rank movies for a viewer profile
    Movies(InputArgs),
    /// Rank vacancies for a job seeker profile
    Jobs(InputArgs),
}

#[derive(Debug, Args)]
struct InputArgs {
    /// Profile JSON object file
    #[arg(long, requires = "candidates")]
    profile: Option<PathBuf>,

    /// Candidate JSON array file
    #[arg(long, requires = "profile")]
    candidates: Option<PathBuf>,

    /// Envelope JSON: {"user": {...}, "movies"|"vacancies": [...]}
    #[arg(long, env = "RECO_PAYLOAD")]
    payload: Option<String>,

    /// Rank the built-in sample data (default when no input is given)
    #[arg(long)]
    demo: bool,
}

impl Command {
    fn domain(&self) -> Domain {
        match self {
            Command::Movies(_) => Domain::Movies,
            Command::Jobs(_) => Domain::Vacancies,
        }
    }

    fn input(&self) -> &InputArgs {
        match self {
            Command::Movies(input) | Command::Jobs(input) => input,
        }
    }
}

fn read_file(path: &Path) -> Result<String, RecoError> {
    std::fs::read_to_string(path).map_err(|source| RecoError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolves the request; returns whether it came from the demo data.
fn load_request(domain: Domain, input: &InputArgs) -> Result<(RecoRequest, bool), RecoError> {
    if input.demo {
        return Ok((demo::request(domain)?, true));
    }
    if let (Some(profile), Some(candidates)) = (&input.profile, &input.candidates) {
        let request = RecoRequest::from_documents(domain, &read_file(profile)?, &read_file(candidates)?)?;
        return Ok((request, false));
    }
    if let Some(payload) = &input.payload {
        return Ok((RecoRequest::from_payload(domain, payload)?, false));
    }
    debug!("no input given; using demo data");
    Ok((demo::request(domain)?, true))
}

fn run(cli: &Cli, config: &EmbeddingConfig) -> Result<String, RecoError> {
    let domain = cli.command.domain();
    let (request, is_demo) = load_request(domain, cli.command.input())?;

    let embedder = CascadingEmbedder::from_config(config);
    debug!(backends = ?embedder.backends(), "embedding cascade ready");
    let ranker = Ranker::new(&embedder);
    let results = request.rank(&ranker);
    info!(
        domain = domain.candidates_key(),
        candidates = results.len(),
        "ranking complete"
    );

    let output = if is_demo {
        serde_json::to_string_pretty(&results)?
    } else {
        serde_json::to_string(&results)?
    };
    Ok(output)
}

fn main() -> ExitCode {
    dotenv().ok();
    let cli = Cli::parse();

    let mut config = EmbeddingConfig::from_env();
    if cli.force_tfidf {
        config.force_statistical = true;
    }
    if cli.debug {
        config.debug = true;
    }

    init_tracing_subscriber("reco", config.debug);
    install_tracing_panic_hook("reco");

    match run(&cli, &config) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "ranking failed");
            println!("{}", error_body(&err));
            ExitCode::FAILURE
        }
    }
}
