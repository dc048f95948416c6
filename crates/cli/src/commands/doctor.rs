//! `hireline doctor` — Diagnose setup problems.

use hireline_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("Hireline Doctor — Setup Diagnostics");
    println!("===================================");
    println!();

    let mut issues = 0;

    // Config file
    let config_path = AppConfig::config_dir().join("config.toml");
    let config = if config_path.exists() {
        match AppConfig::load() {
            Ok(config) => {
                println!("  [ok]   Config file valid");
                Some(config)
            }
            Err(e) => {
                println!("  [FAIL] Config file invalid: {e}");
                issues += 1;
                None
            }
        }
    } else {
        println!("  [warn] No config file — run `hireline config init` (defaults in use)");
        AppConfig::load().ok()
    };

    if let Some(config) = config {
        // API key
        if config.has_api_key() {
            println!("  [ok]   API key configured");
        } else {
            println!("  [FAIL] No API key — set HIRELINE_API_KEY or add api_key to config.toml");
            issues += 1;
        }

        // Provider construction and reachability
        match hireline_providers::from_config(&config) {
            Ok(provider) => {
                println!("  [ok]   Provider '{}' configured", provider.name());
                match provider.health_check().await {
                    Ok(true) => println!("  [ok]   Provider reachable"),
                    Ok(false) => {
                        println!("  [warn] Provider responded but reported unhealthy");
                        issues += 1;
                    }
                    Err(e) => {
                        println!("  [warn] Provider unreachable: {e}");
                        issues += 1;
                    }
                }
            }
            Err(e) => {
                println!("  [FAIL] Provider not configured: {e}");
                issues += 1;
            }
        }
    }

    // Tools
    let registry = hireline_tools::standard_registry();
    let mut names = registry.names();
    names.sort_unstable();
    println!("  [ok]   Tools registered: {}", names.join(", "));

    println!();
    if issues == 0 {
        println!("  All checks passed.");
    } else {
        println!("  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
