use clap::{Parser, Subcommand};
use resynth::{validate_input, Config, SongResynth};
use std::path::PathBuf;

/// Note-Based Song Resynthesis
#[derive(Parser)]
#[command(name = "resynth")]
#[command(about = "Recreate a recorded performance from pitched note samples")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a song and resynthesize it from note samples
    Recreate {
        /// Input song file (WAV)
        input: PathBuf,

        /// Directory of single-note WAV samples
        #[arg(short, long)]
        notes: PathBuf,

        /// Note frequency table (built and cached here if absent)
        #[arg(short, long, default_value = "note_frequencies.json")]
        table: PathBuf,

        /// Output directory for results
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,

        /// Custom configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Quiet output
        #[arg(short, long)]
        quiet: bool,
    },
    /// Build the note frequency table from a sample directory
    BuildTable {
        /// Directory of single-note WAV samples
        notes: PathBuf,

        /// Where to write the table
        #[arg(short, long, default_value = "note_frequencies.json")]
        output: PathBuf,

        /// Custom configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Validate configuration file
    ValidateConfig {
        /// Configuration file to validate
        config: PathBuf,
    },
    /// Show default configuration
    ShowConfig,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Recreate {
            input,
            notes,
            table,
            output,
            config,
            quiet,
        } => {
            let config = if let Some(config_path) = config {
                resynth::config::load_config(config_path)?
            } else {
                Config::default()
            };

            validate_input(&input, &config)?;

            let processor = SongResynth::new(config);
            let summary = processor.process(&input, &notes, &table, &output)?;

            if !quiet {
                println!();
                println!("Top {} notes:", summary.top_notes.len());
                for entry in &summary.top_notes {
                    println!("  {:>5}x  {}", entry.count, entry.note);
                }
                println!("Results saved to {}", output.display());
            }
        }
        Commands::BuildTable {
            notes,
            output,
            config,
        } => {
            let config = if let Some(config_path) = config {
                resynth::config::load_config(config_path)?
            } else {
                Config::default()
            };

            let table = resynth::notes::build_note_table(&notes, &config.table)?;
            table.save(&output)?;
            println!("Wrote {} note frequencies to {}", table.len(), output.display());
        }
        Commands::ValidateConfig { config } => {
            let config = resynth::config::load_config(config)?;
            println!("Configuration is valid");
            if let Ok(json) = serde_json::to_string_pretty(&config) {
                println!("{}", json);
            }
        }
        Commands::ShowConfig => {
            let config = Config::default();
            let json = serde_json::to_string_pretty(&config)?;
            println!("{}", json);
        }
    }

    Ok(())
}
