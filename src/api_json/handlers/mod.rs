pub mod export;
pub mod records;
pub mod upload;

pub use export::*;
pub use records::*;
pub use upload::*;

use actix_web::web;

use crate::error::{StatsError, StatsResult};

/// Ejecuta trabajo bloqueante (SQLite, calamine, umya) fuera del hilo del
/// servidor. Si el pool de bloqueo falla se reporta como error de E/S.
pub(crate) async fn run_blocking<F, T>(job: F) -> StatsResult<T>
where
    F: FnOnce() -> StatsResult<T> + Send + 'static,
    T: Send + 'static,
{
    match web::block(job).await {
        Ok(result) => result,
        Err(e) => Err(StatsError::Io(std::io::Error::other(e.to_string()))),
    }
}
