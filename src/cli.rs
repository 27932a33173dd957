//! Command-line interface definitions using clap
//!
//! This module defines the CLI structure for tappio using clap's derive macros.

use clap::{Parser, Subcommand};

use crate::storage::CodeType;

/// Tappio - NFC business cards and review plaques
#[derive(Parser)]
#[command(name = "tappio")]
#[command(version)]
#[command(about = "NFC business-card and review-plaque service", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, short = 'c', global = true, default_value = "config.toml")]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default when no command is given)
    Serve,

    /// Generate a batch of unclaimed codes
    GenerateCodes {
        /// Number of codes (1-500)
        #[arg(long, short = 'n')]
        count: usize,

        /// Code type: profile (6 chars) or review (8 chars)
        #[arg(long = "type", short = 't', default_value = "profile")]
        code_type: CodeType,
    },

    /// Export unclaimed codes to CSV
    ExportCodes {
        /// Only export this code type
        #[arg(long = "type", short = 't')]
        code_type: Option<CodeType>,

        /// Output file path (default: stdout)
        file_path: Option<String>,
    },

    /// Create an admin account, or promote an existing one
    CreateAdmin {
        /// Account email
        email: String,

        /// Password (if not provided, will prompt interactively)
        #[arg(long)]
        password: Option<String>,

        /// Read password from stdin (for scripting)
        #[arg(long)]
        stdin: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Force overwrite without confirmation
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_generate_codes() {
        let cli = Cli::parse_from(["tappio", "generate-codes", "-n", "20", "--type", "review"]);
        match cli.command {
            Some(Commands::GenerateCodes { count, code_type }) => {
                assert_eq!(count, 20);
                assert_eq!(code_type, CodeType::Review);
            }
            _ => panic!("expected generate-codes"),
        }
        assert_eq!(cli.config, "config.toml");
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::parse_from(["tappio", "-c", "/etc/tappio.toml", "serve"]);
        assert_eq!(cli.config, "/etc/tappio.toml");
        assert!(matches!(cli.command, Some(Commands::Serve)));
    }

    #[test]
    fn test_no_command_defaults_to_none() {
        let cli = Cli::parse_from(["tappio"]);
        assert!(cli.command.is_none());
    }
}
