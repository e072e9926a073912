use owo_colors::OwoColorize;

#[tokio::main]
async fn main() {
    // Load .env file if it exists (optional - won't fail if missing)
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: Error loading .env file: {}", e);
        }
    }

    if let Err(e) = vault_helper::cli::run_cli().await {
        eprintln!("{} {:#}", "Error:".red(), e);
        std::process::exit(1);
    }
}
