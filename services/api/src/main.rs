#[tokio::main]
async fn main() {
    if let Err(err) = study_match_api::run().await {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
