pub mod api_json;
pub mod config;
pub mod error;
pub mod excel;
pub mod models;
pub mod pipeline;
pub mod server;
pub mod storage;

pub use config::AppConfig;
pub use error::{StatsError, StatsResult};
pub use server::{configure_routes, run_server};
