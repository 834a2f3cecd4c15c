#[tokio::main]
async fn main() -> anyhow::Result<()> {
    projdeps_lib::main().await
}
