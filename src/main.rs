#[tokio::main]
async fn main() -> anyhow::Result<()> {
    linkchat::run().await
}
