// Ollama generative backend
// Author: Gabriel Demetrios Lafis

use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::{json, Value as JsonValue};

use super::{GenerationOutcome, GenerativeBackend, TranslateError};

/// Calls a local Ollama server's `/api/generate` endpoint
pub struct OllamaBackend {
    url: String,
    model: String,
    client: Client,
}

impl OllamaBackend {
    /// Create a backend for `model` served at `url`
    pub fn new(url: &str, model: &str, timeout: Duration) -> Result<Self, TranslateError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TranslateError::Backend(e.to_string()))?;

        Ok(OllamaBackend {
            url: url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client,
        })
    }

    fn request(&self, prompt: &str, temperature: f32) -> Result<String, String> {
        let response = self
            .client
            .post(format!("{}/api/generate", self.url))
            .json(&json!({
                "model": self.model,
                "prompt": prompt,
                "stream": false,
                "options": { "temperature": temperature },
            }))
            .send()
            .map_err(|e| format!("Failed to call Ollama: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(format!("Ollama returned {}: {}", status, body));
        }

        let body: JsonValue = response
            .json()
            .map_err(|e| format!("Failed to parse Ollama response: {}", e))?;

        body["response"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| "Ollama response has no 'response' field".to_string())
    }
}

impl GenerativeBackend for OllamaBackend {
    fn generate(&self, prompt: &str, temperature: f32) -> GenerationOutcome {
        match self.request(prompt, temperature) {
            Ok(text) => GenerationOutcome::Generated(text),
            Err(reason) => GenerationOutcome::Failed(reason),
        }
    }
}
