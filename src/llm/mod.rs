//! 文本生成能力：统一的模型接口、基于rig的实现以及智能体可调用的工具

use anyhow::Result;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub mod client;
pub mod tools;

#[cfg(test)]
pub(crate) mod testing;

pub use client::LLMClient;

/// 文本生成协作方
///
/// 接收指令与输入，返回自由文本或符合给定结构的数据。
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// 结构化数据提取，输出结构由`T`的JSON Schema约束
    async fn extract<T>(&self, system_prompt: &str, user_prompt: &str) -> Result<T>
    where
        T: JsonSchema + for<'a> Deserialize<'a> + Serialize + Send + Sync + 'static;

    /// 单轮对话，不提供工具
    async fn prompt(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;

    /// 多轮对话，模型可以调用网页搜索工具
    async fn prompt_with_tools(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;
}
