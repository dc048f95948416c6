//! `hireline intake` — Run a contract intake conversation.

use async_trait::async_trait;
use hireline_agent::{Disposition, HumanPort, IntakeSession, SessionOutcome};
use hireline_config::AppConfig;
use hireline_core::Validator;
use hireline_core::error::SessionError;
use std::io::Write as _;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

/// A console operator: questions go to stdout, answers come from stdin.
struct ConsoleHuman {
    lines: tokio::sync::Mutex<Lines<BufReader<Stdin>>>,
}

impl ConsoleHuman {
    fn new() -> Self {
        Self {
            lines: tokio::sync::Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }
}

#[async_trait]
impl HumanPort for ConsoleHuman {
    async fn prompt(&self, text: &str) -> Result<String, SessionError> {
        self.show(text).await?;
        print!("  You > ");
        std::io::stdout()
            .flush()
            .map_err(|e| SessionError::InputFailed(e.to_string()))?;

        let mut lines = self.lines.lock().await;
        match lines.next_line().await {
            Ok(Some(line)) => Ok(line),
            Ok(None) => Err(SessionError::InputClosed),
            Err(e) => Err(SessionError::InputFailed(e.to_string())),
        }
    }

    async fn show(&self, text: &str) -> Result<(), SessionError> {
        println!();
        for line in text.lines() {
            println!("  {line}");
        }
        println!();
        Ok(())
    }
}

pub async fn run(message: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    // Check for an API key early and give a clear error.
    if config.api_key.is_none() {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    HIRELINE_API_KEY   (generic)");
        eprintln!("    ANTHROPIC_API_KEY  (for the anthropic provider)");
        eprintln!("    OPENAI_API_KEY     (for the openai provider)");
        eprintln!();
        eprintln!("  Or add api_key to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let provider = hireline_providers::from_config(&config)?;
    let tools = Arc::new(hireline_tools::standard_registry());
    let system_prompt = hireline_agent::system_prompt(&config.intake)?;
    let validator = Validator::with_signatories(config.intake.signatories());

    println!();
    println!("  Hireline — Contract Intake");
    println!("  ==========================");
    println!();
    println!("  Provider:  {}", config.provider);
    println!("  Model:     {}", config.model);
    println!();
    println!("  Describe the contract you need. Type 'exit' to quit.");

    let human = Arc::new(ConsoleHuman::new());

    let opening = match message {
        Some(m) => m,
        None => human.prompt("How can I help?").await?,
    };

    let mut session = IntakeSession::new(provider, tools, human, &config.model)
        .with_temperature(config.temperature)
        .with_max_tokens(config.max_tokens)
        .with_max_tool_rounds(config.max_tool_rounds)
        .with_validator(validator)
        .with_system_prompt(system_prompt);

    match session.run(opening).await? {
        SessionOutcome::Finalized {
            record,
            disposition,
        } => {
            let label = match disposition {
                Disposition::Created => "CONTRACT CREATED",
                Disposition::Updated => "CONTRACT UPDATED",
            };
            println!();
            println!("  {label} (session {})", session.session_id());
            println!();
            let json = serde_json::to_string_pretty(&record)?;
            for line in json.lines() {
                println!("  {line}");
            }
            println!();
        }
        SessionOutcome::Cancelled { reason } => {
            println!();
            println!("  Session cancelled: {reason}");
            println!();
        }
    }

    Ok(())
}
