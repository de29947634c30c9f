// Copyright 2026 Talking Agents Contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Model providers.
//!
//! Gemini is the only backend today; the [`Provider`] trait keeps the agent
//! loop independent of it.

pub mod gemini;

pub use gemini::GeminiProvider;

use crate::config::Settings;
use crate::error::ProviderError;
use crate::types::BoxedProvider;

/// Create a provider for the given model from the settings.
pub fn create_provider(settings: &Settings, model: &str) -> Result<BoxedProvider, ProviderError> {
    let api_key = settings
        .google_api_key
        .as_ref()
        .ok_or_else(|| ProviderError::NotConfigured("GOOGLE_API_KEY is not set".to_string()))?;

    let provider = match &settings.gemini_base_url {
        Some(base_url) => GeminiProvider::with_base_url(api_key, model, base_url),
        None => GeminiProvider::new(api_key, model),
    };
    Ok(Box::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_create_provider_requires_api_key() {
        let settings = Settings::from_vars(&HashMap::new());
        let result = create_provider(&settings, "gemini-1.5-flash");
        assert!(matches!(result, Err(ProviderError::NotConfigured(_))));
    }

    #[test]
    fn test_create_provider_normalizes_model() {
        let vars: HashMap<String, String> =
            [("GOOGLE_API_KEY".to_string(), "key".to_string())].into();
        let settings = Settings::from_vars(&vars);
        let provider = create_provider(&settings, "gemini/gemini-1.5-flash").unwrap();
        assert_eq!(provider.model(), "gemini-1.5-flash");
        assert_eq!(provider.name(), "gemini");
    }
}
