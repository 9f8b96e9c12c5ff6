use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use log::LevelFilter;

use mxtrace::{
    compatibility_hint, FallbackPolicy, HttpDelegate, MatrixSource, Operation, Outcome, Session,
    SessionConfig, TraceRenderer,
};

#[derive(Parser)]
#[command(author, version, long_about = None)]
#[command(about = "mxtrace - matrix operations with step-by-step derivations")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Remote arithmetic service, e.g. http://localhost:8080
    #[arg(long, global = true)]
    backend: Option<String>,

    /// Request timeout for the remote service
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// What to do when the remote service fails (strict|local)
    #[arg(long, global = true)]
    fallback: Option<FallbackPolicy>,

    /// Largest denominator shown in fractions (0 shows decimals)
    #[arg(long, global = true)]
    max_denominator: Option<u64>,

    /// Print the outcome as JSON
    #[arg(long, global = true)]
    json: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// A + B
    Add(Binary),
    /// A − B
    Sub(Binary),
    /// A × B
    Mul(Binary),
    /// Reduced row-echelon form of A
    Rref {
        /// Matrix literal ("1 2; 3 4") or generator ("random:3x3")
        a: MatrixSource,
    },
    /// Which operations the shapes of A and B allow
    Hint(Binary),
}

#[derive(Args)]
struct Binary {
    /// Matrix literal ("1 2; 3 4") or generator ("identity:2x2")
    a: MatrixSource,
    /// Matrix literal or generator
    b: MatrixSource,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = configure(&cli)?;
    let renderer = TraceRenderer::new(config.fractions);

    let (op, a, b) = match &cli.command {
        Commands::Add(args) => (Operation::Add, args.a.build(), Some(args.b.build())),
        Commands::Sub(args) => (Operation::Subtract, args.a.build(), Some(args.b.build())),
        Commands::Mul(args) => (Operation::Multiply, args.a.build(), Some(args.b.build())),
        Commands::Rref { a } => (Operation::ReduceToRref, a.build(), None),
        Commands::Hint(args) => {
            let (a, b) = (args.a.build(), args.b.build());
            println!("{}", compatibility_hint(a.dimensions(), b.dimensions()));
            return Ok(());
        }
    };

    let outcome = match config.backend_url.clone() {
        Some(url) => {
            let delegate = HttpDelegate::new(&url, config.timeout)?;
            Session::new(delegate, config).compute(op, &a, b.as_ref()).await
        }
        None => Session::local(config).compute(op, &a, b.as_ref()).await,
    };

    print_outcome(&outcome, &renderer, cli.json)?;
    if !outcome.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// Environment first, then command-line flags
fn configure(cli: &Cli) -> Result<SessionConfig, Box<dyn std::error::Error>> {
    let mut config = SessionConfig::from_env()?;
    if let Some(url) = &cli.backend {
        config = config.with_backend_url(url.clone());
    }
    if let Some(ms) = cli.timeout_ms {
        config = config.with_timeout(Duration::from_millis(ms));
    }
    if let Some(policy) = cli.fallback {
        config = config.with_fallback(policy);
    }
    if let Some(den) = cli.max_denominator {
        let fractions = config.fractions.with_max_denominator(den);
        config = config.with_fractions(fractions);
    }
    Ok(config)
}

fn print_outcome(
    outcome: &Outcome,
    renderer: &TraceRenderer,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
        return Ok(());
    }

    match (outcome.result(), outcome.error()) {
        (Some(result), _) => {
            println!("{}", outcome.steps());
            println!();
            println!("Result ({}):", result.dimensions());
            // tab-separated, ready to paste into a spreadsheet
            println!("{}", renderer.text(result).to_tsv());
        }
        (None, Some(error)) => eprintln!("error: {error}"),
        (None, None) => {}
    }
    for notice in outcome.notices() {
        eprintln!("note: {notice}");
    }
    Ok(())
}
