mod args;
mod batch;
mod cli;
mod estimate;
mod options;
mod programs;
mod render;
mod session;

use nmt_advisor::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
