// Natural-language to SQL translation
// Author: Gabriel Demetrios Lafis

mod ollama;

pub use ollama::*;

use log::{debug, warn};
use serde::Serialize;
use thiserror::Error;

/// Sampling temperature used for generative translation
pub const TRANSLATION_TEMPERATURE: f32 = 0.1;

/// Build the fixed prompt sent to a generative backend
pub fn build_prompt(question: &str) -> String {
    format!(
        "Convert to SQL: {}\n\
         Tables: users(id,name,email,country,signup_date), orders(id,user_id,product,amount,order_date)\n\
         Return only SQL:",
        question
    )
}

/// Outcome of a single generative call
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    Generated(String),
    Failed(String),
}

/// A text generation service able to turn a prompt into SQL
pub trait GenerativeBackend {
    /// Generate a completion for `prompt`
    fn generate(&self, prompt: &str, temperature: f32) -> GenerationOutcome;
}

/// How a query string was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationStrategy {
    Generative,
    Rules,
    Passthrough,
}

/// A question paired with the query it resolved to
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranslationResult {
    pub question: String,
    pub query: String,
    pub strategy: TranslationStrategy,
}

/// Represents an error while setting up translation
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Keyword rules, evaluated in priority order
pub fn rule_based_sql(question: &str) -> String {
    if question.contains("USA") {
        "SELECT * FROM users WHERE country = 'USA'".to_string()
    } else if question.to_lowercase().contains("count") {
        "SELECT COUNT(*) as count FROM users".to_string()
    } else {
        "SELECT * FROM users".to_string()
    }
}

/// Whether the text already is a SQL statement
pub fn looks_like_sql(text: &str) -> bool {
    let first = text.split_whitespace().next().unwrap_or("").to_uppercase();
    matches!(first.as_str(), "SELECT" | "WITH" | "PRAGMA")
}

/// Natural-language translator with an optional generative backend
pub struct Translator {
    backend: Option<Box<dyn GenerativeBackend>>,
    temperature: f32,
}

impl Translator {
    /// Translator that only uses the keyword rules
    pub fn rules_only() -> Self {
        Translator {
            backend: None,
            temperature: TRANSLATION_TEMPERATURE,
        }
    }

    /// Translator that asks `backend` first
    pub fn with_backend<B: GenerativeBackend + 'static>(backend: B) -> Self {
        Translator {
            backend: Some(Box::new(backend)),
            temperature: TRANSLATION_TEMPERATURE,
        }
    }

    /// Override the sampling temperature passed to the backend
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Whether a generative backend is configured
    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    /// Translate `question` into a query. Never fails.
    pub fn translate(&self, question: &str) -> TranslationResult {
        if let Some(backend) = &self.backend {
            match backend.generate(&build_prompt(question), self.temperature) {
                GenerationOutcome::Generated(text) if !text.trim().is_empty() => {
                    let query = text.trim().to_string();
                    debug!("Generated SQL for {:?}: {}", question, query);
                    return TranslationResult {
                        question: question.to_string(),
                        query,
                        strategy: TranslationStrategy::Generative,
                    };
                }
                GenerationOutcome::Generated(_) => {
                    warn!("Generative backend returned an empty response, using rules");
                }
                GenerationOutcome::Failed(reason) => {
                    warn!("Generative backend failed ({}), using rules", reason);
                }
            }
        }

        TranslationResult {
            question: question.to_string(),
            query: rule_based_sql(question),
            strategy: TranslationStrategy::Rules,
        }
    }

    /// Pass SQL through unchanged, translate anything else
    pub fn resolve(&self, text: &str) -> TranslationResult {
        if looks_like_sql(text) {
            TranslationResult {
                question: text.to_string(),
                query: text.to_string(),
                strategy: TranslationStrategy::Passthrough,
            }
        } else {
            self.translate(text)
        }
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::rules_only()
    }
}
