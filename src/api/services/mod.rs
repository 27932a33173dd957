pub mod admin;
pub mod auth;
pub mod error_code;
pub mod health;
pub mod helpers;
pub mod owner;
pub mod profiles;
pub mod public;
pub mod redirect;
pub mod types;

pub use admin::admin_routes;
pub use auth::{AuthService, LoginKeyExtractor, auth_routes, login_rate_limiter};
pub use error_code::ErrorCode;
pub use health::{AppStartTime, HealthService, health_routes};
pub use helpers::CookieBuilder;
pub use owner::owner_routes;
pub use profiles::profile_routes;
pub use public::{PublicService, public_routes};
pub use redirect::{RedirectService, redirect_routes};
