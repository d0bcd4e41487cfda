//! `ledgerbrief onboard` — First-time setup.

use ledgerbrief_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");

    println!("Ledgerbrief — First-Time Setup");
    println!("==============================\n");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("  Created config directory: {}", config_dir.display());
    } else {
        println!("  Config directory exists:  {}", config_dir.display());
    }

    if config_path.exists() {
        println!("\n  Config already exists at: {}", config_path.display());
        println!("  Edit it manually or delete and re-run onboard.\n");
        return Ok(());
    }

    let default_toml = AppConfig::default_toml();
    std::fs::write(&config_path, &default_toml)?;
    println!("  Created config.toml at:   {}", config_path.display());

    println!("\nNext steps:");
    println!("  1. Export OPENAI_API_KEY (or set the key in config.toml)");
    println!("  2. Export MJ_APIKEY_PUBLIC and MJ_APIKEY_PRIVATE for email dispatch");
    println!("  3. Place the knowledge index under data/accounting/");
    println!("     (chunks.lbx and metadata.json; optional, retrieval degrades without it)");
    println!("  4. Run: ledgerbrief serve\n");

    Ok(())
}
