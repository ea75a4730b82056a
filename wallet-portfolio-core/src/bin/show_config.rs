use wallet_portfolio_core::{CoreConfig, NAME, VERSION};

fn main() {
    let config = match CoreConfig::load() {
        Ok(config) => config,
        Err(error) => {
            eprintln!("Invalid configuration: {}", error);
            std::process::exit(1);
        }
    };

    println!("{} {} Configuration:\n", NAME, VERSION);
    println!("  View Cache Limit: {}", config.cache_limit);
    println!("  Cache Concurrency: {}", config.cache_concurrency);
    println!("  Realtime Concurrency: {}", config.realtime_concurrency);
    println!("  Log Level: {}", config.log_level);
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("\n{}", json),
        Err(error) => eprintln!("Could not serialize configuration: {}", error),
    }
}
