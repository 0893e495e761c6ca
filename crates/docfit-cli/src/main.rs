use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use docfit_core::{
    get_default_config_path, DocumentFitter, FitPath, FitRequest, FitResult, FitterConfig,
    Strategy, KNOWN_PROVIDER_PROFILES,
};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "docfit")]
#[command(about = "Fit documents into AI provider context windows")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ~/.docfit/config.json)
    #[arg(long, global = true, env = "DOCFIT_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short, global = true, default_value = "false")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit a document and print the result
    Fit {
        /// Document file; reads stdin when omitted
        file: Option<PathBuf>,

        #[arg(long, short, default_value = "openai")]
        provider: String,

        /// aggressive, balanced, conservative or preserve_all
        #[arg(long, short, default_value = "balanced")]
        strategy: String,

        /// Explicit token ceiling, overriding the provider's
        #[arg(long)]
        max_tokens: Option<u32>,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the character budget for a provider
    Budget {
        #[arg(long, short, default_value = "openai")]
        provider: String,

        #[arg(long, short, default_value = "balanced")]
        strategy: String,

        #[arg(long)]
        max_tokens: Option<u32>,
    },
    /// List provider profiles in effect
    Providers,
    /// Write the default configuration
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Fit {
            file,
            provider,
            strategy,
            max_tokens,
            json,
        } => {
            let fitter = load_fitter(cli.config.as_ref()).await?;
            let document = read_document(file.as_ref()).await?;

            let mut request = FitRequest::new(&document, &provider).with_strategy(&strategy);
            if let Some(tokens) = max_tokens {
                request = request.with_token_ceiling(tokens);
            }
            let result = fitter.fit(request);

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                let mut stdout = io::stdout().lock();
                stdout.write_all(result.text.as_bytes())?;
                stdout.flush()?;
                print_summary(&result);
            }

            if !result.is_valid {
                anyhow::bail!("document could not be fitted");
            }
        }
        Commands::Budget {
            provider,
            strategy,
            max_tokens,
        } => {
            let fitter = load_fitter(cli.config.as_ref()).await?;
            let budget = fitter.budget_for(&provider, Strategy::parse(&strategy), max_tokens);
            let profile = fitter.registry().resolve(&provider);

            println!("{} {}", "Provider:".bold(), budget.provider);
            println!("{} {}", "Strategy:".bold(), budget.strategy);
            println!("{} {}", "Token ceiling:".bold(), budget.token_ceiling);
            println!("{} {}", "Fill fraction:".bold(), budget.fill_fraction);
            println!("{} {}", "Char ceiling:".bold(), budget.char_ceiling);
            println!(
                "{} {}",
                "Hard char ceiling:".bold(),
                profile.hard_char_ceiling
            );
        }
        Commands::Providers => {
            let fitter = load_fitter(cli.config.as_ref()).await?;
            println!(
                "{:<10} {:>8} {:>10} {:>10} {:>12}",
                "provider", "tokens", "absolute", "hard", "split at"
            );
            for builtin in KNOWN_PROVIDER_PROFILES {
                let profile = fitter.registry().get(builtin.provider);
                let split_at = profile
                    .split
                    .map(|s| s.must_split_threshold.to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{:<10} {:>8} {:>10} {:>10} {:>12}",
                    profile.provider.to_string(),
                    profile.token_ceiling,
                    profile.absolute_char_limit,
                    profile.hard_char_ceiling,
                    split_at
                );
            }
        }
        Commands::InitConfig { force } => {
            let path = cli.config.unwrap_or_else(get_default_config_path);
            if path.exists() && !force {
                anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
            }
            FitterConfig::default()
                .save_to(&path)
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("{} {}", "Wrote".green(), path.display());
        }
    }

    Ok(())
}

/// Logs go to stderr so stdout carries only the fitted payload.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .with_line_number(false),
        )
        .init();
}

async fn load_fitter(path: Option<&PathBuf>) -> anyhow::Result<DocumentFitter> {
    let config = match path {
        Some(path) => FitterConfig::load_from(path)
            .await
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => FitterConfig::load_user_config()
            .await
            .context("failed to load user config")?,
    };
    Ok(DocumentFitter::new(config)?)
}

async fn read_document(file: Option<&PathBuf>) -> anyhow::Result<String> {
    match file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut document = String::new();
            io::stdin()
                .read_to_string(&mut document)
                .context("failed to read stdin")?;
            Ok(document)
        }
    }
}

fn print_summary(result: &FitResult) {
    let path = match result.path {
        FitPath::Direct => result.path.as_str().green(),
        FitPath::SimpleTruncate | FitPath::SectionedSplit => result.path.as_str().yellow(),
        FitPath::Empty | FitPath::Emergency | FitPath::Catastrophic => {
            result.path.as_str().red()
        }
    };

    eprintln!();
    eprintln!(
        "{} {} chars -> {} chars ({:.1}% kept, ~{} tokens) via {}",
        "[docfit]".dimmed(),
        result.original_size,
        result.optimized_size,
        result.kept_percentage(),
        result.estimated_tokens,
        path
    );
    if let (Some(total), Some(selected)) = (result.section_count, result.selected_section_count) {
        eprintln!(
            "{} kept {} of {} sections",
            "[docfit]".dimmed(),
            selected,
            total
        );
    }
    if let Some(error) = &result.error {
        eprintln!("{} {}", "[docfit]".dimmed(), error.red());
    }
}
