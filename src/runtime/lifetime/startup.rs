use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

use crate::api::ApiState;
use crate::services::AppServices;
use crate::storage::{SeaOrmStorage, StorageFactory};

pub struct StartupContext {
    pub storage: Arc<SeaOrmStorage>,
    pub services: AppServices,
}

/// 安装 rustls 加密后端；重复安装时忽略
fn install_crypto_provider() {
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }
}

/// CLI 模式只需要存储与 service，不创建上传目录
pub async fn prepare_cli_startup() -> Result<StartupContext> {
    install_crypto_provider();

    let config = crate::config::get_config();
    let storage = StorageFactory::create()
        .await
        .context("Failed to create storage backend")?;
    let services = AppServices::new(storage.clone(), &config);

    Ok(StartupContext { storage, services })
}

/// 准备服务器启动的上下文
/// 包括存储、service 与上传目录
pub async fn prepare_server_startup() -> Result<(StartupContext, ApiState)> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let context = prepare_cli_startup().await?;
    info!("Using storage backend: {}", context.storage.backend_name());

    let config = crate::config::get_config();
    tokio::fs::create_dir_all(&config.uploads.dir)
        .await
        .with_context(|| format!("Failed to create upload directory {}", config.uploads.dir))?;
    debug!("Upload directory ready: {}", config.uploads.dir);

    let state = ApiState::new(context.services.clone(), &config);

    info!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );
    Ok((context, state))
}
