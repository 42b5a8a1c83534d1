use api_client::frameworks::cli;

#[tokio::main]
async fn main() {
    cli::run().await;
}
