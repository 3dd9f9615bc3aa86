//! Reef Server - e-commerce catalog and order backend
//!
//! # Architecture overview
//!
//! - **HTTP API** (`api`): RESTful routes for users, categories, products
//!   and orders
//! - **Authentication** (`auth`): JWT bearer tokens, Argon2 password hashes
//! - **Database** (`db`): embedded SurrealDB storage with record links
//! - **Order workflow** (`orders`): line-item resolution, price aggregation,
//!   lifecycle transitions and cascading deletion
//!
//! # Module structure
//!
//! ```text
//! reef-server/src/
//! ├── core/          # configuration, state, server
//! ├── auth/          # JWT service, auth middleware
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # models and repositories
//! ├── orders/        # order workflow
//! └── utils/         # errors, logging, validation
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod orders;
pub mod utils;

// Re-export public types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - structured events on the "security" target
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($rest:tt)*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($rest)*
        );
    };
}

/// Load .env and initialize logging
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    init_logger();
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    ____             ____
   / __ \___  ___  / __/
  / /_/ / _ \/ _ \/ /_
 / _, _/  __/  __/ __/
/_/ |_|\___/\___/_/
    "#
    );
}
