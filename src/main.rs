use clap::Parser;

use tappio::cli::Cli;
use tappio::config::{get_config, init_config_from};
use tappio::runtime::modes::{self, Mode};
use tappio::system::logging::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_config_from(&cli.config);
    let config = get_config();

    // 保持 guard 存活直到进程退出，确保日志刷盘
    let _log_guard = init_logging(&config.logging)?;

    match modes::detect_mode(cli.command.as_ref()) {
        Mode::Server => modes::run_server().await,
        Mode::Cli => {
            let Some(command) = cli.command else {
                return Ok(());
            };
            if let Err(e) = modes::run_cli(command).await {
                eprintln!("{}", e.format_colored());
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
