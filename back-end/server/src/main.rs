use errors::AppError;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    server::runner::run().await
}
