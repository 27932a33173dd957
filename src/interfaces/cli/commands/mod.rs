//! CLI command implementations

mod codes;
mod config_gen;
mod create_admin;

pub use codes::{export_codes, generate_codes};
pub use config_gen::config_generate;
pub use create_admin::create_admin;
