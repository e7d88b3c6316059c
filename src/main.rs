#[tokio::main]
async fn main() {
    std::process::exit(issuehub_lib::run().await);
}
