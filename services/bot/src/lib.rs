mod cli;
mod infra;
mod lookup;
mod routes;
mod server;
mod telegram;

use permesso::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
