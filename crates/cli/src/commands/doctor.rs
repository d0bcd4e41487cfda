//! `ledgerbrief doctor` — Diagnose configuration, credentials, and data files.

use std::time::Duration;

use ledgerbrief_config::AppConfig;
use ledgerbrief_knowledge::KnowledgeIndex;
use ledgerbrief_providers::build_from_config;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("Ledgerbrief Doctor");
    println!("==================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_dir().join("config.toml");
    let config = if config_path.exists() {
        match AppConfig::load() {
            Ok(config) => {
                println!("  ok    Config file valid: {}", config_path.display());
                config
            }
            Err(e) => {
                println!("  fail  Config file invalid: {e}");
                println!("\n  1 issue found. Fix the config before running other checks.");
                return Ok(());
            }
        }
    } else {
        println!("  warn  No config file, using defaults (run `ledgerbrief onboard`)");
        issues += 1;
        AppConfig::default()
    };

    if config.generation_api_key().is_some() {
        println!("  ok    Generation API key configured");
    } else {
        println!("  warn  No generation API key (set OPENAI_API_KEY or edit config.toml)");
        issues += 1;
    }

    if let Some(provider) = build_from_config(&config).default() {
        // Keep the probe short; the shared client's own timeout is sized
        // for generation calls, not diagnostics.
        match tokio::time::timeout(Duration::from_secs(5), provider.health_check()).await {
            Ok(Ok(true)) => println!("  ok    Provider endpoint reachable"),
            Ok(Ok(false)) => {
                println!("  warn  Provider endpoint answered with an error status");
                issues += 1;
            }
            Ok(Err(e)) => {
                println!("  warn  Provider endpoint unreachable: {e}");
                issues += 1;
            }
            Err(_) => {
                println!("  warn  Provider endpoint probe timed out");
                issues += 1;
            }
        }
    }

    if config.delivery.has_credentials() {
        println!("  ok    Mail credentials configured");
    } else {
        println!("  warn  No mail credentials (set MJ_APIKEY_PUBLIC and MJ_APIKEY_PRIVATE)");
        issues += 1;
    }

    match KnowledgeIndex::load(&config.knowledge.index_path, &config.knowledge.metadata_path) {
        Ok(index) => {
            println!(
                "  ok    Knowledge index loaded: {} chunks, {} dimensions",
                index.len(),
                index.dim()
            );
        }
        Err(e) => {
            println!("  warn  Knowledge index unavailable: {e}");
            println!("        (retrieval degrades to a placeholder; generation still works)");
            issues += 1;
        }
    }

    match std::fs::create_dir_all(&config.output.dir) {
        Ok(()) => println!("  ok    Output directory writable: {}", config.output.dir),
        Err(e) => {
            println!("  fail  Output directory not writable: {e}");
            issues += 1;
        }
    }

    println!();
    if issues == 0 {
        println!("  All checks passed.");
    } else {
        println!("  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
