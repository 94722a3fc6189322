//! policytypes-gen — entry point.

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use policytypes::OutputFormat;
use policytypes_gen::pipeline::{self, CheckOutcome};
use policytypes_gen::GenerateConfig;

#[derive(Parser)]
#[command(
    name = "policytypes-gen",
    about = "Regenerate the nsContentPolicyType list from mozilla-central",
    version
)]
struct Cli {
    #[command(flatten)]
    source: SourceArgs,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Clone, Default)]
struct SourceArgs {
    /// URL of nsIContentPolicy.idl. Also reads POLICYTYPES_URL.
    #[arg(long)]
    url: Option<String>,

    /// Read the IDL from a local file instead of fetching it.
    #[arg(long, conflicts_with = "url")]
    input: Option<PathBuf>,

    /// Output file. Also reads POLICYTYPES_OUTPUT.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (list, rust-enum, json).
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Fail unless declared values strictly increase.
    #[arg(long)]
    check_ordinals: bool,

    /// Request timeout in milliseconds. No timeout when omitted.
    #[arg(long)]
    timeout_ms: Option<u64>,
}

impl SourceArgs {
    /// Subcommand flags win; anything unset falls back to the top-level flags.
    ///
    /// Clap only sees `--url`/`--input` conflicts within one level, so the
    /// merged result is checked again here.
    fn or(self, fallback: SourceArgs) -> anyhow::Result<SourceArgs> {
        let merged = SourceArgs {
            url: self.url.or(fallback.url),
            input: self.input.or(fallback.input),
            output: self.output.or(fallback.output),
            format: self.format.or(fallback.format),
            check_ordinals: self.check_ordinals || fallback.check_ordinals,
            timeout_ms: self.timeout_ms.or(fallback.timeout_ms),
        };
        if merged.url.is_some() && merged.input.is_some() {
            anyhow::bail!("--url and --input cannot be used together");
        }
        Ok(merged)
    }

    fn into_config(self) -> GenerateConfig {
        GenerateConfig::resolve(
            self.url.as_deref(),
            self.input.as_deref(),
            self.output.as_deref(),
            self.timeout_ms,
        )
        .with_format(self.format.unwrap_or_default())
        .with_ordinal_check(self.check_ordinals)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the IDL and write the generated file (default).
    Generate(SourceArgs),

    /// Regenerate in memory and report whether the output file is stale.
    Check(SourceArgs),

    /// Generate shell completion scripts.
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut stdout = std::io::stdout().lock();

    match cli.command.unwrap_or_else(|| Commands::Generate(SourceArgs::default())) {
        Commands::Generate(args) => {
            let config = args.or(cli.source)?.into_config();
            tracing::debug!(?config, "resolved configuration");
            let summary = pipeline::generate(&config, &mut stdout).await?;
            tracing::debug!(bytes = summary.bytes, "generate finished");
        }

        Commands::Check(args) => {
            let config = args.or(cli.source)?.into_config();
            match pipeline::check(&config, &mut stdout).await? {
                CheckOutcome::UpToDate => {}
                CheckOutcome::Stale | CheckOutcome::Missing => {
                    eprintln!(
                        "{} needs regenerating: run policytypes-gen generate",
                        config.output.display()
                    );
                    std::process::exit(1);
                }
            }
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "policytypes-gen", &mut stdout);
        }
    }

    Ok(())
}
