//! Provenance Verifier CLI
//!
//! Command-line interface for verifying asset provenance and producing
//! best-effort signed copies, with simulator-mode overrides and
//! configuration support.

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use provenance_verifier::{
    ConfigManager, FetchUrl, SignOutcome, SignWorkflow, VerifierConfig, VerifyWorkflow,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "provenance-verifier")]
#[command(about = "Asset provenance verification with deterministic simulator fallback")]
#[command(long_about = "
Provenance Verifier - trust verdicts for digital assets

EXAMPLES:
    # Verify a local file (simulator mode unless configured otherwise)
    provenance-verifier verify flyer.png

    # Force the deterministic simulator for a stable demo verdict
    provenance-verifier verify flyer.verified.png --simulator

    # Fetch and verify a remote asset
    provenance-verifier verify-url https://example.org/press/photo.jpg

    # Produce a best-effort signed copy
    provenance-verifier sign flyer.png -o flyer.signed.png

    # Show the effective configuration
    provenance-verifier config show

ENVIRONMENT VARIABLES:
    C2PA_BIN        External verification/signing tool (default: c2patool)
    SIGN_CERT       Signing certificate path
    SIGN_KEY        Signing key path
    PV_SIMULATOR    Set to 0 to attempt real tooling
    STORAGE_DIR     Root directory for stored assets
    BASE_URL        External base URL for stored assets
    RUST_LOG        Logging level (debug, info, warn, error)
")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify a local asset and print the verdict
    Verify {
        /// Asset file to verify
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Force the deterministic simulator
        #[arg(long, conflicts_with = "real")]
        simulator: bool,

        /// Attempt real tooling even if the environment says otherwise
        #[arg(long)]
        real: bool,
    },

    /// Fetch a remote asset, store it, and verify it
    VerifyUrl {
        /// HTTP(S) URL of the asset
        #[arg(value_name = "URL")]
        url: String,
    },

    /// Produce a signed (or best-effort) copy of an asset
    Sign {
        /// Asset file to sign
        #[arg(value_name = "INPUT_FILE")]
        input: PathBuf,

        /// Output file path
        #[arg(short, long, value_name = "OUTPUT_FILE")]
        output: PathBuf,

        /// Optional manifest to embed
        #[arg(short, long, value_name = "MANIFEST_FILE")]
        manifest: Option<PathBuf>,
    },

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Write a default configuration file
    Init,
    /// Print the configuration file path
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Verify {
            file,
            simulator,
            real,
        } => {
            let mut config = VerifierConfig::from_env();
            if simulator {
                config.simulator_mode = true;
            }
            if real {
                config.simulator_mode = false;
            }

            let workflow = VerifyWorkflow::new(config);
            let response = workflow.run_with_response(&file, None).await;
            let rendered = serde_json::to_string_pretty(&response).into_diagnostic()?;
            println!("{rendered}");
        }

        Commands::VerifyUrl { url } => {
            let url = FetchUrl::new(&url).into_diagnostic()?;
            let workflow = VerifyWorkflow::new(VerifierConfig::from_env());
            let response = workflow.run_url(&url).await;
            let rendered = serde_json::to_string_pretty(&response).into_diagnostic()?;
            println!("{rendered}");
        }

        Commands::Sign {
            input,
            output,
            manifest,
        } => {
            let workflow = SignWorkflow::new(VerifierConfig::from_env());
            let outcome = workflow.run(&input, &output, manifest.as_deref()).await;
            match outcome {
                SignOutcome::SignedWithTool => {
                    println!("Signed {} -> {}", input.display(), output.display());
                }
                SignOutcome::SimulatedSignature => {
                    println!(
                        "Simulated signature: {} -> {}",
                        input.display(),
                        output.display()
                    );
                }
                SignOutcome::CopiedUnsigned => {
                    println!(
                        "Signing unavailable; copied unsigned: {} -> {}",
                        input.display(),
                        output.display()
                    );
                }
                SignOutcome::Placeholder => {
                    println!("Signing failed; wrote placeholder at {}", output.display());
                }
            }
        }

        Commands::Config(config_cmd) => handle_config_command(config_cmd)?,
    }

    Ok(())
}

fn handle_config_command(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            let config = VerifierConfig::from_env();
            let rendered = toml::to_string_pretty(&config).into_diagnostic()?;
            println!("{rendered}");
        }
        ConfigCommands::Init => {
            let manager = ConfigManager::new().into_diagnostic()?;
            let config = manager.load_or_create_default().into_diagnostic()?;
            println!(
                "Configuration ready at {} (tool: {})",
                manager.config_path().display(),
                config.tool_bin
            );
        }
        ConfigCommands::Path => {
            let path = ConfigManager::default_config_path().into_diagnostic()?;
            println!("{}", path.display());
        }
    }
    Ok(())
}
