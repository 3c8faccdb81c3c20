//! 测试用的脚本化模型，按顺序返回预置的应答并记录收到的调用

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

use super::LanguageModel;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum CallKind {
    Extract,
    Prompt,
    PromptWithTools,
}

#[derive(Debug, Clone)]
pub(crate) struct RecordedCall {
    pub kind: CallKind,
    pub system_prompt: String,
    pub user_prompt: String,
}

#[derive(Default)]
pub(crate) struct ScriptedModel {
    extractions: Mutex<VecDeque<Result<Value>>>,
    replies: Mutex<VecDeque<Result<String>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extraction(self, value: Value) -> Self {
        self.extractions.lock().unwrap().push_back(Ok(value));
        self
    }

    pub fn with_reply(self, reply: &str) -> Self {
        self.replies.lock().unwrap().push_back(Ok(reply.to_string()));
        self
    }

    pub fn with_extraction_failure(self, message: &str) -> Self {
        self.extractions
            .lock()
            .unwrap()
            .push_back(Err(anyhow!(message.to_string())));
        self
    }

    pub fn with_reply_failure(self, message: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Err(anyhow!(message.to_string())));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, kind: CallKind, system_prompt: &str, user_prompt: &str) {
        self.calls.lock().unwrap().push(RecordedCall {
            kind,
            system_prompt: system_prompt.to_string(),
            user_prompt: user_prompt.to_string(),
        });
    }

    fn next_reply(&self) -> Result<String> {
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(anyhow!("no scripted reply left")))
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn extract<T>(&self, system_prompt: &str, user_prompt: &str) -> Result<T>
    where
        T: JsonSchema + for<'a> Deserialize<'a> + Serialize + Send + Sync + 'static,
    {
        self.record(CallKind::Extract, system_prompt, user_prompt);
        let value = self
            .extractions
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(anyhow!("no scripted extraction left")))?;
        Ok(serde_json::from_value(value)?)
    }

    async fn prompt(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        self.record(CallKind::Prompt, system_prompt, user_prompt);
        self.next_reply()
    }

    async fn prompt_with_tools(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        self.record(CallKind::PromptWithTools, system_prompt, user_prompt);
        self.next_reply()
    }
}
