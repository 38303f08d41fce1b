mod cli;
mod infra;
mod report;
mod routes;
mod server;

use wellness_advisor::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
