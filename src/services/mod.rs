//! Service layer for business logic
//!
//! HTTP 处理器与 CLI 共用的业务逻辑。每个 service 持有
//! `Arc<SeaOrmStorage>`，自身不保存可变状态。

mod account_service;
mod code_service;
mod dashboard_service;
mod feedback_service;
mod plaque_service;
mod profile_service;
pub mod resolver;

use std::sync::Arc;

pub use account_service::*;
pub use code_service::*;
pub use dashboard_service::*;
pub use feedback_service::*;
pub use plaque_service::*;
pub use profile_service::*;
pub use resolver::{CodeLookup, Navigation, resolve};

use crate::config::StaticConfig;
use crate::storage::SeaOrmStorage;

/// 全部 service 的集合，启动时构建一次
#[derive(Clone)]
pub struct AppServices {
    pub storage: Arc<SeaOrmStorage>,
    pub codes: Arc<CodeService>,
    pub profiles: Arc<ProfileService>,
    pub plaques: Arc<PlaqueService>,
    pub feedback: Arc<FeedbackService>,
    pub accounts: Arc<AccountService>,
    pub dashboard: Arc<DashboardService>,
}

impl AppServices {
    pub fn new(storage: Arc<SeaOrmStorage>, config: &StaticConfig) -> Self {
        let base_url = config.server.base_url();
        Self {
            codes: Arc::new(CodeService::new(storage.clone(), base_url)),
            profiles: Arc::new(ProfileService::from_config(storage.clone(), config)),
            plaques: Arc::new(PlaqueService::new(storage.clone(), base_url)),
            feedback: Arc::new(FeedbackService::new(storage.clone())),
            accounts: Arc::new(AccountService::new(storage.clone())),
            dashboard: Arc::new(DashboardService::new(storage.clone())),
            storage,
        }
    }
}
