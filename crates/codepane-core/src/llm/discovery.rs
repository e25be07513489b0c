use crate::constants::endpoints::TAGS_PATH;
use crate::llm::ollama::ModelSummary;
use std::time::Duration;

/// Probe for a running local Ollama server.
pub struct LocalDiscovery;

impl LocalDiscovery {
    /// Check if Ollama answers on `base_url` within a couple of seconds.
    pub async fn ollama_available(base_url: &str) -> bool {
        let client = match reqwest::Client::builder()
            .timeout(Duration::from_secs(2))
            .build()
        {
            Ok(client) => client,
            Err(_) => return false,
        };

        let url = format!("{}{}", base_url.trim_end_matches('/'), TAGS_PATH);
        match client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

/// Human label for a model entry, e.g. `llama3:8b (4.3GB)`.
pub fn format_model_name(model: &ModelSummary) -> String {
    if model.size > 0 {
        let gb = model.size as f64 / 1_073_741_824.0;
        format!("{} ({:.1}GB)", model.name, gb)
    } else {
        model.name.clone()
    }
}
