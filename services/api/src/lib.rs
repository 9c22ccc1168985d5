mod cli;
mod infra;
mod play;
mod routes;
mod server;

use mind_blown::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
