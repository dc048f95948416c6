//! `hireline config` — Configuration management commands.

use hireline_config::AppConfig;

pub async fn show() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

pub async fn path() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = AppConfig::config_dir().join("config.toml");
    println!("{}", config_path.display());
    Ok(())
}

pub async fn init() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");

    if config_path.exists() {
        println!("Config file already exists at {}", config_path.display());
        return Ok(());
    }

    std::fs::create_dir_all(&config_dir)?;
    std::fs::write(&config_path, AppConfig::default_toml())?;
    println!("Wrote default config to {}", config_path.display());
    Ok(())
}

pub async fn validate() -> Result<(), Box<dyn std::error::Error>> {
    println!("Validating configuration...");

    match AppConfig::load() {
        Ok(config) => {
            println!("   Config parsed successfully");

            let mut warnings = Vec::new();

            if config.api_key.is_none() {
                warnings.push(
                    "No API key set (set HIRELINE_API_KEY, ANTHROPIC_API_KEY, or OPENAI_API_KEY)",
                );
            }

            if warnings.is_empty() {
                println!("   All checks passed");
            } else {
                println!();
                for w in &warnings {
                    println!("   Warning: {w}");
                }
            }

            println!();
            println!("   Provider:     {}", config.provider);
            println!("   Model:        {}", config.model);
            println!("   Temperature:  {}", config.temperature);
            println!("   Tool rounds:  {}", config.max_tool_rounds);
            println!(
                "   Signatories:  {}",
                config.intake.signatories().join(", ")
            );
        }
        Err(e) => {
            println!("   Config error: {e}");
            return Err(e.into());
        }
    }

    Ok(())
}
