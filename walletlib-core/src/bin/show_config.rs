use walletlib_core::{init_logging, init_wallet_core_with, WalletConfig, WalletState};

#[tokio::main]
async fn main() {
    init_logging();

    let config = match WalletConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid wallet configuration: {}", e);
            std::process::exit(1);
        }
    };

    println!("WalletLib Configuration:\n");
    println!("  Backend: {}", config.repository.backend_name());
    let currencies = if config.currencies.is_empty() {
        "(none)".to_string()
    } else {
        config.currencies.join(", ")
    };
    println!("  Currencies: {}", currencies);
    println!("  Create clean: {}", config.create_clean);
    match serde_json::to_string_pretty(&config.repository) {
        Ok(settings) => println!("  Repository settings: {}", settings),
        Err(e) => println!("  Repository settings: (unavailable: {})", e),
    }

    let startup = match init_wallet_core_with(&config).await {
        Ok(startup) => startup,
        Err(e) => {
            eprintln!("Failed to open wallet: {}", e);
            std::process::exit(1);
        }
    };

    match startup.controller().await.current_state() {
        WalletState::Valid { balances } => {
            let mut entries: Vec<_> = balances.into_iter().collect();
            entries.sort();
            println!("\n  Wallet:");
            for (currency, amount) in entries {
                println!("    {}: {}", currency, amount);
            }
        }
        WalletState::Error { message } => println!("\n  Wallet error: {}", message),
        WalletState::Loading => println!("\n  Wallet still loading"),
    }
}
