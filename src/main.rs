// --- Servicio de estadísticas de voluntariado - Archivo principal ---

use env_logger::Env;
use volunteer_stats::{run_server, AppConfig};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let _ = dotenv::dotenv();
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let config = AppConfig::from_env();
    run_server(config).await
}
