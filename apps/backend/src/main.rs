//! Backend server entry point

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    vocab_trainer_backend::run().await
}
