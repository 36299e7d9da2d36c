use clap::Parser;
use std::path::PathBuf;
use unlinked::commands::{self, UnlinkedArgs};
use unlinked::{Formulary, Layout, colors, formulary};

/// List installed formulae that are not linked, excluding keg-only formulae
/// (since those are expected to be unlinked anyway).
#[derive(Parser)]
#[command(name = "unlinked")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Append each formula's description
    #[arg(long)]
    desc: bool,

    /// Append why each formula is unlinked
    #[arg(long)]
    reason: bool,

    /// Print the report as JSON (includes descriptions and reasons)
    #[arg(long)]
    json: bool,

    /// Use only the cached formula index; never touch the network
    #[arg(long, env = "HOMEBREW_OFFLINE")]
    offline: bool,

    /// Homebrew prefix (defaults to the platform's standard prefix)
    #[arg(long, env = "HOMEBREW_PREFIX")]
    prefix: Option<PathBuf>,

    /// Cellar location (defaults to <prefix>/Cellar)
    #[arg(long, env = "HOMEBREW_CELLAR")]
    cellar: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn layout(&self) -> Layout {
        let mut layout = match &self.prefix {
            Some(prefix) => Layout::new(prefix),
            None => Layout::from_env(),
        };
        if let Some(cellar) = &self.cellar {
            layout = layout.with_cellar(cellar);
        }
        if let Some(repository) = std::env::var_os("HOMEBREW_REPOSITORY") {
            layout = layout.with_repository(repository);
        }
        layout
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries only the report
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    colors::init_colors();

    let layout = cli.layout();
    tracing::debug!("using layout {:?}", layout);

    let formulae = formulary::load_formulae(cli.offline).await;
    let formulary = Formulary::new(formulae).with_taps(&layout.taps);
    tracing::debug!("indexed {} formulae", formulary.len());

    let args = UnlinkedArgs {
        desc: cli.desc,
        reason: cli.reason,
        json: cli.json,
    };

    // Filesystem scan and classification are blocking work
    tokio::task::spawn_blocking(move || commands::unlinked(&layout, &formulary, args)).await??;

    Ok(())
}
