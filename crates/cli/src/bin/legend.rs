use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    legend_cli::main_entry().await
}
