//! Wilaya Ingest - builds wilayaData.json from the reference tables

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use wilaya_common::logging::{init_logging, LogConfig, LogLevel};
use wilaya_ingest::config::{DATA_DIR_ENV, OUTPUT_ENV};
use wilaya_ingest::{pipeline, IngestConfig};

#[derive(Parser, Debug)]
#[command(name = "wilaya-ingest")]
#[command(author, version, about = "Merge wilaya reference tables into one lookup file")]
struct Cli {
    /// Directory holding the source tables [default: ./data]
    #[arg(short, long, env = DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,

    /// Output file [default: wilayaData.json]
    #[arg(short, long, env = OUTPUT_ENV)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    // Environment variables take precedence over the flag
    let log_config = LogConfig::builder()
        .level(log_level)
        .log_file_prefix("wilaya-ingest")
        .build()
        .merge_env()?;

    let _log_guard = init_logging(&log_config)?;

    let mut config = IngestConfig::from_env();
    if let Some(dir) = cli.data_dir {
        config = config.with_data_dir(dir);
    }
    if let Some(output) = cli.output {
        config = config.with_output_path(output);
    }

    pipeline::run(&config)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_cli_reads_paths_from_env() {
        std::env::set_var(DATA_DIR_ENV, "/srv/tables");
        std::env::set_var(OUTPUT_ENV, "/srv/out.json");

        let cli = Cli::try_parse_from(["wilaya-ingest"]).unwrap();

        std::env::remove_var(DATA_DIR_ENV);
        std::env::remove_var(OUTPUT_ENV);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/srv/tables")));
        assert_eq!(cli.output, Some(PathBuf::from("/srv/out.json")));
    }

    #[test]
    #[serial]
    fn test_cli_flag_beats_env() {
        std::env::set_var(DATA_DIR_ENV, "/srv/tables");

        let cli = Cli::try_parse_from(["wilaya-ingest", "--data-dir", "local"]).unwrap();

        std::env::remove_var(DATA_DIR_ENV);
        assert_eq!(cli.data_dir, Some(PathBuf::from("local")));
        assert_eq!(cli.output, None);
    }
}
