//! LLM provider implementations for Hireline.
//!
//! Two backends behind the [`Provider`] trait:
//! - [`AnthropicProvider`] — Anthropic's native Messages API
//! - [`OpenAiCompatProvider`] — any OpenAI-compatible `/chat/completions`
//!   endpoint
//!
//! [`from_config`] picks the right one from the loaded [`AppConfig`].

pub mod anthropic;
pub mod openai_compat;

pub use anthropic::AnthropicProvider;
pub use openai_compat::OpenAiCompatProvider;

use hireline_config::AppConfig;
use hireline_core::Provider;
use hireline_core::error::ProviderError;
use std::sync::Arc;

/// Build the configured provider.
///
/// Fails with [`ProviderError::NotConfigured`] when no API key is available
/// or the provider name is unknown.
pub fn from_config(config: &AppConfig) -> Result<Arc<dyn Provider>, ProviderError> {
    let api_key = config.api_key.clone().ok_or_else(|| {
        ProviderError::NotConfigured(
            "no API key: set api_key in config.toml or the HIRELINE_API_KEY environment variable"
                .into(),
        )
    })?;

    match config.provider.as_str() {
        "anthropic" => {
            let mut provider = AnthropicProvider::new(api_key);
            if let Some(url) = &config.api_url {
                provider = provider.with_base_url(url.clone());
            }
            Ok(Arc::new(provider))
        }
        "openai" => {
            let provider = match &config.api_url {
                Some(url) => OpenAiCompatProvider::new("openai", url.clone(), api_key),
                None => OpenAiCompatProvider::openai(api_key),
            };
            Ok(Arc::new(provider))
        }
        other => Err(ProviderError::NotConfigured(format!(
            "unknown provider '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_api_key_is_not_configured() {
        let config = AppConfig::default();
        let err = from_config(&config).err().unwrap();
        assert!(matches!(err, ProviderError::NotConfigured(_)));
    }

    #[test]
    fn selects_anthropic() {
        let config = AppConfig {
            api_key: Some("sk-ant-test".into()),
            ..AppConfig::default()
        };
        let provider = from_config(&config).unwrap();
        assert_eq!(provider.name(), "anthropic");
    }

    #[test]
    fn selects_openai() {
        let config = AppConfig {
            api_key: Some("sk-test".into()),
            provider: "openai".into(),
            ..AppConfig::default()
        };
        let provider = from_config(&config).unwrap();
        assert_eq!(provider.name(), "openai");
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let config = AppConfig {
            api_key: Some("key".into()),
            provider: "cohere".into(),
            ..AppConfig::default()
        };
        assert!(from_config(&config).is_err());
    }
}
