use async_trait::async_trait;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::TempDir;
use zodiac_fortune::error::Result;
use zodiac_fortune::providers::{CompletionResponse, Message, Provider};

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// Provider that answers with fixed text and remembers every prompt
#[allow(dead_code)]
pub struct StubProvider {
    reply: String,
    prompts: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl StubProvider {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for StubProvider {
    async fn complete(&self, messages: &[Message]) -> Result<CompletionResponse> {
        let prompt = messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        self.prompts.lock().unwrap().push(prompt);
        Ok(CompletionResponse::new(Message::assistant(self.reply.clone())))
    }
}

/// Provider whose every call fails
#[allow(dead_code)]
pub struct UnreachableProvider;

#[async_trait]
impl Provider for UnreachableProvider {
    async fn complete(&self, _messages: &[Message]) -> Result<CompletionResponse> {
        Err(anyhow::anyhow!("connection refused"))
    }
}
