//! LLM客户端 - 提供统一的LLM服务接口

use anyhow::Result;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::future::Future;

use crate::config::LLMConfig;
use crate::llm::LanguageModel;
use crate::llm::tools::web_search::AgentToolWebSearch;

mod providers;

use providers::ProviderClient;

/// LLM客户端 - 提供统一的LLM服务接口
#[derive(Clone)]
pub struct LLMClient {
    config: LLMConfig,
    client: ProviderClient,
    web_search: AgentToolWebSearch,
}

impl LLMClient {
    /// 创建新的LLM客户端
    pub fn new(config: LLMConfig) -> Result<Self> {
        let client = ProviderClient::new(&config)?;
        let web_search = AgentToolWebSearch::new(config.search_results);
        Ok(Self {
            config,
            client,
            web_search,
        })
    }

    pub fn model_name(&self) -> &str {
        &self.config.model
    }

    /// 检查模型连接和功能是否正常
    pub async fn check_connection(&self) -> Result<()> {
        println!("🔄 Checking model connection ({} / {})...", self.config.provider, self.config.model);
        match self
            .prompt("System: You are a helpful assistant.", "Hello")
            .await
        {
            Ok(_) => {
                println!("✅ Model connection OK");
                Ok(())
            }
            Err(e) => {
                eprintln!("❌ Model connection failed: {}", e);
                Err(e)
            }
        }
    }

    /// 按配置的尝试次数执行异步操作，默认只尝试一次
    async fn retry_with_backoff<T, F, Fut>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, anyhow::Error>>,
    {
        let max_attempts = self.config.retry_attempts.max(1);
        let retry_delay_ms = self.config.retry_delay_ms;
        let mut attempts = 0;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(err) => {
                    attempts += 1;
                    if attempts >= max_attempts {
                        return Err(err);
                    }
                    tracing::warn!(
                        attempt = attempts,
                        max_attempts,
                        error = %err,
                        "model call failed, retrying"
                    );
                    tokio::time::sleep(std::time::Duration::from_millis(retry_delay_ms)).await;
                }
            }
        }
    }
}

#[async_trait]
impl LanguageModel for LLMClient {
    async fn extract<T>(&self, system_prompt: &str, user_prompt: &str) -> Result<T>
    where
        T: JsonSchema + for<'a> Deserialize<'a> + Serialize + Send + Sync + 'static,
    {
        let extractor =
            self.client
                .create_extractor::<T>(&self.config.model, system_prompt, &self.config);

        self.retry_with_backoff(|| async { extractor.extract(user_prompt).await })
            .await
    }

    async fn prompt(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let agent = self
            .client
            .create_agent(&self.config.model, system_prompt, &self.config);

        self.retry_with_backoff(|| async { agent.prompt(user_prompt).await })
            .await
    }

    async fn prompt_with_tools(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let agent = self.client.create_agent_with_tools(
            &self.config.model,
            system_prompt,
            &self.config,
            &self.web_search,
        );
        let max_turns = self.config.max_tool_turns;

        self.retry_with_backoff(|| async {
            agent
                .multi_turn(user_prompt, max_turns)
                .await
                .map_err(|e| anyhow::anyhow!("tool-assisted prompt failed: {}", e))
        })
        .await
    }
}
