//! 码库存 CLI 命令

use std::io::Write;

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::services::CodeService;
use crate::storage::CodeType;

/// 批量生成码并逐行输出
pub async fn generate_codes(
    codes: &CodeService,
    count: usize,
    code_type: CodeType,
) -> Result<(), CliError> {
    let generated = codes.generate(count, code_type, None).await?;

    println!(
        "{} Generated {} {} code(s)",
        "✓".green().bold(),
        generated.len().to_string().cyan(),
        code_type.to_string().magenta()
    );
    for code in &generated {
        println!("  {}  {}", code.code.cyan(), codes.scan_url(&code.code).dimmed());
    }
    Ok(())
}

/// 导出未认领码为 CSV，未指定路径时写到 stdout
pub async fn export_codes(
    codes: &CodeService,
    code_type: Option<CodeType>,
    file_path: Option<String>,
) -> Result<(), CliError> {
    let csv = codes.export_csv(code_type).await?;

    match file_path {
        Some(path) => {
            std::fs::write(&path, &csv)
                .map_err(|e| CliError::CommandError(format!("Failed to write {}: {}", path, e)))?;
            println!("{} Exported codes to {}", "✓".green().bold(), path.blue());
        }
        None => {
            std::io::stdout()
                .write_all(&csv)
                .map_err(|e| CliError::CommandError(format!("Failed to write output: {}", e)))?;
        }
    }
    Ok(())
}
