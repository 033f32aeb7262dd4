//! # LLM Helpers
//!
//! Provider matching in one place. radkit's `LlmFunction` / `LlmWorker`
//! builders need a concrete type implementing `BaseLlm`, so callers write their
//! body once against a generic `llm` binding and this macro expands it per provider.

/// Bind `$llm` to the concrete client selected by a [`ModelConfig`](crate::models::ModelConfig)
/// and evaluate `$body` with it.
///
/// Must be used inside a function returning `anyhow::Result`.
#[macro_export]
macro_rules! with_llm {
    ($config:expr, $llm:ident => $body:expr) => {{
        use radkit::models::providers::{
            AnthropicLlm, DeepSeekLlm, GeminiLlm, GrokLlm, OpenAILlm, OpenRouterLlm,
        };
        use $crate::models::LlmProvider;

        let config = $config;
        match config.provider {
            LlmProvider::Anthropic => {
                let $llm = AnthropicLlm::from_env(&config.model)?;
                $body
            }
            LlmProvider::OpenAI => {
                let mut $llm = OpenAILlm::from_env(&config.model)?;
                if let Some(base_url) = &config.base_url {
                    $llm = $llm.with_base_url(base_url);
                }
                $body
            }
            LlmProvider::Gemini => {
                let $llm = GeminiLlm::from_env(&config.model)?;
                $body
            }
            LlmProvider::OpenRouter => {
                let $llm = OpenRouterLlm::from_env(&config.model)?;
                $body
            }
            LlmProvider::Grok => {
                let $llm = GrokLlm::from_env(&config.model)?;
                $body
            }
            LlmProvider::DeepSeek => {
                let $llm = DeepSeekLlm::from_env(&config.model)?;
                $body
            }
        }
    }};
}

pub use with_llm;
