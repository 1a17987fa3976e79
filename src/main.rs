use ideogram_mcp::config::ServerConfig;

#[tokio::main]
async fn main() {
    let config = match ServerConfig::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("ideogram-mcp: {}", err);
            std::process::exit(1);
        }
    };
    if let Err(err) = ideogram_mcp::mcp::server::run_stdio(config).await {
        eprintln!("ideogram-mcp: {}", err);
        std::process::exit(1);
    }
}
