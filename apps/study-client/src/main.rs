#[tokio::main]
async fn main() -> anyhow::Result<()> {
    flashcard_study::run().await
}
