use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use schemabridge::config::Config;
use schemabridge::storage::SqliteModelRegistry;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

pub const DRAFT_MODEL: &str = "llama3.2:latest";
pub const CONVERSION_MODEL: &str = "qwen2.5:7b";

#[allow(dead_code)]
pub fn create_temp_registry() -> (SqliteModelRegistry, TempDir) {
    let tmp = TempDir::new().expect("failed to create tempdir");
    let db_path = tmp.path().join("models.db");
    let registry =
        SqliteModelRegistry::new_with_path(db_path).expect("failed to create model registry");
    (registry, tmp)
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// Config pointing the Ollama provider at `host` and the registry at `registry`
#[allow(dead_code)]
pub fn ollama_config(host: &str, registry: &SqliteModelRegistry) -> Config {
    let mut config = Config::default();
    config.provider.provider_type = "ollama".to_string();
    config.provider.ollama.host = host.to_string();
    config.provider.ollama.model = DRAFT_MODEL.to_string();
    config.registry.db_path = Some(registry.db_path().to_string_lossy().to_string());
    config
}

fn ollama_reply(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "message": {"role": "assistant", "content": content},
        "done": true,
        "prompt_eval_count": 10,
        "eval_count": 5
    }))
}

/// Answer draft requests with `draft`
#[allow(dead_code)]
pub async fn mount_draft_reply(server: &MockServer, draft: &str) {
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({"model": DRAFT_MODEL})))
        .respond_with(ollama_reply(draft))
        .mount(server)
        .await;
}

/// Answer conversion requests with the masked source block of the prompt
#[allow(dead_code)]
pub async fn mount_echo_conversion(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({"model": CONVERSION_MODEL})))
        .respond_with(|request: &Request| {
            let body: Value = serde_json::from_slice(&request.body).unwrap_or(Value::Null);
            let prompt = body["messages"][0]["content"].as_str().unwrap_or_default();
            ollama_reply(&format!("```json\n{}\n```", first_json_block(prompt)))
        })
        .mount(server)
        .await;
}

fn first_json_block(prompt: &str) -> &str {
    let start = match prompt.find("```json\n") {
        Some(i) => i + "```json\n".len(),
        None => return "null",
    };
    match prompt[start..].find("\n```") {
        Some(end) => &prompt[start..start + end],
        None => "null",
    }
}

/// Prompts received by the mock server, in arrival order
#[allow(dead_code)]
pub async fn received_prompts(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter_map(|r| serde_json::from_slice::<Value>(&r.body).ok())
        .filter_map(|b| b["messages"][0]["content"].as_str().map(str::to_string))
        .collect()
}
