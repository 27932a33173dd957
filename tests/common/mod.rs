//! 集成测试共用的环境：临时 SQLite、service 与会话状态

#![allow(dead_code)]

use std::sync::Arc;

use tempfile::TempDir;

use tappio::api::ApiState;
use tappio::config::StaticConfig;
use tappio::services::{AppServices, Credentials, SessionUser};
use tappio::storage::{CodeType, NfcCode, SeaOrmStorage};

pub const TEST_PASSWORD: &str = "correct horse battery";

pub struct TestEnv {
    pub config: StaticConfig,
    pub storage: Arc<SeaOrmStorage>,
    pub services: AppServices,
    pub state: ApiState,
    // 最后 drop：先关闭连接再删除临时目录
    pub dir: TempDir,
}

pub fn test_config(dir: &TempDir) -> StaticConfig {
    let mut config = StaticConfig::default();
    config.auth.jwt_secret = "integration-test-secret-with-32-bytes!!".to_string();
    config.auth.cookie_secure = false;
    config.auth.login_burst = 1000;
    config.uploads.dir = dir.path().join("uploads").to_string_lossy().into_owned();
    config
}

pub async fn setup() -> TestEnv {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("tappio_test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let storage = Arc::new(
        SeaOrmStorage::new(&db_url, "sqlite", 1)
            .await
            .expect("Failed to create storage"),
    );
    let config = test_config(&dir);
    let services = AppServices::new(storage.clone(), &config);
    let state = ApiState::new(services.clone(), &config);

    TestEnv {
        config,
        storage,
        services,
        state,
        dir,
    }
}

impl TestEnv {
    pub async fn seed_code(&self, code: &str, code_type: CodeType) -> NfcCode {
        self.storage
            .insert_codes(&[code.to_string()], code_type, None)
            .await
            .expect("Failed to seed code")
            .remove(0)
    }

    /// 注册一个普通用户并返回 (用户, Bearer token)
    pub async fn sign_up(&self, email: &str) -> (SessionUser, String) {
        let issued = self
            .state
            .sessions
            .sign_up(&Credentials {
                email: email.to_string(),
                password: TEST_PASSWORD.to_string(),
            })
            .await
            .expect("Failed to sign up");
        (issued.user, issued.token)
    }

    /// 创建管理员并登录
    pub async fn sign_in_admin(&self, email: &str) -> (SessionUser, String) {
        self.services
            .accounts
            .create_admin(email, TEST_PASSWORD)
            .await
            .expect("Failed to create admin");
        let issued = self
            .state
            .sessions
            .sign_in(&Credentials {
                email: email.to_string(),
                password: TEST_PASSWORD.to_string(),
            })
            .await
            .expect("Failed to sign in admin");
        (issued.user, issued.token)
    }
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

/// 用 `api::configure` 构建与服务器一致的测试 App
#[macro_export]
macro_rules! init_app {
    ($env:expr) => {{
        let state = $env.state.clone();
        actix_web::test::init_service(
            actix_web::App::new().configure(move |cfg| tappio::api::configure(cfg, &state)),
        )
        .await
    }};
}
