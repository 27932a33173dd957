//! CLI interface module
//!
//! This module provides command-line interface functionality for tappio.

pub mod commands;

use std::fmt;

use crate::cli::{Commands, ConfigCommands};
use crate::runtime::lifetime::startup::prepare_cli_startup;
use commands::{config_generate, create_admin, export_codes, generate_codes};

#[derive(Debug)]
pub enum CliError {
    StorageError(String),
    ParseError(String),
    CommandError(String),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::StorageError(msg) => format!("Storage error: {}", msg),
            CliError::ParseError(msg) => format!("Parse error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    /// Format as colored output
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::StorageError(msg) => {
                format!("{} {}", "Storage error:".red().bold(), msg.white())
            }
            CliError::ParseError(msg) => {
                format!("{} {}", "Parse error:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<crate::errors::TappioError> for CliError {
    fn from(err: crate::errors::TappioError) -> Self {
        match err {
            crate::errors::TappioError::Validation(msg) => CliError::ParseError(msg),
            other if other.is_internal() => CliError::StorageError(other.to_string()),
            other => CliError::CommandError(other.message().to_string()),
        }
    }
}

/// Run a CLI command from clap-parsed input
///
/// `Serve` 由调用方处理，不会进入这里。
pub async fn run_cli_command(cmd: Commands) -> Result<(), CliError> {
    // Generate doesn't need DB connection, handle it separately
    if let Commands::Config {
        action: ConfigCommands::Generate { output_path, force },
    } = cmd
    {
        return config_generate(output_path, force).await;
    }

    let startup = prepare_cli_startup()
        .await
        .map_err(|e| CliError::StorageError(format!("{:#}", e)))?;
    let services = startup.services;

    match cmd {
        Commands::GenerateCodes { count, code_type } => {
            generate_codes(&services.codes, count, code_type).await
        }
        Commands::ExportCodes {
            code_type,
            file_path,
        } => export_codes(&services.codes, code_type, file_path).await,
        Commands::CreateAdmin {
            email,
            password,
            stdin,
        } => create_admin(&services.accounts, email, password, stdin).await,
        Commands::Serve => unreachable!("serve is handled by the server mode"),
        Commands::Config { .. } => unreachable!("handled above"),
    }
}
