use crate::config::{Config, LLMProvider};
use crate::generator::workflow::{FormInput, Surface};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// DeepResearch-RS - 由Rust与AI驱动的深度调研报告生成工具
#[derive(Parser, Debug)]
#[command(name = "deepresearch-rs")]
#[command(
    about = "AI-driven deep research assistant: asks clarifying questions, plans and runs web searches, then writes a detailed markdown report."
)]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// 配置文件路径
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// 输出路径
    #[arg(short, long, global = true)]
    pub output_path: Option<PathBuf>,

    /// 是否启用详细日志
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// LLM Provider (openai, anthropic, deepseek, openrouter, ollama)
    #[arg(long, global = true)]
    pub llm_provider: Option<String>,

    /// 模型名称
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// LLM API基地址
    #[arg(long, global = true)]
    pub llm_api_base_url: Option<String>,

    /// LLM API KEY
    #[arg(long, global = true)]
    pub llm_api_key: Option<String>,

    /// 澄清问题的最大数量
    #[arg(long, global = true)]
    pub max_followup_questions: Option<usize>,

    /// 搜索次数
    #[arg(long, global = true)]
    pub search_count: Option<usize>,

    /// 搜索阶段的最大并发数
    #[arg(long, global = true)]
    pub max_parallels: Option<usize>,

    /// 单个阶段的超时时间（秒）
    #[arg(long, global = true)]
    pub stage_timeout: Option<u64>,

    /// 生成报告后通过邮件发送
    #[arg(long, global = true)]
    pub email: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// 两步表单：提交主题，回答澄清问题后生成报告
    Form {
        /// 调研主题，缺省时交互输入
        #[arg(short, long)]
        topic: Option<String>,

        /// 澄清问题的回答，缺省时在看到问题后交互输入
        #[arg(long)]
        clarification: Option<String>,
    },
    /// 对话模式：逐轮输入主题与澄清回答
    Chat,
}

impl Args {
    /// 交互方式，未指定子命令时进入对话模式
    pub fn surface(&self) -> Surface {
        match &self.command {
            Some(Command::Form {
                topic,
                clarification,
            }) => Surface::Form(FormInput {
                topic: topic.clone(),
                clarification: clarification.clone(),
            }),
            Some(Command::Chat) | None => Surface::Chat,
        }
    }

    /// 将CLI参数转换为配置
    pub fn into_config(self) -> Result<Config> {
        let mut config = Config::load(self.config.as_ref())?;

        if let Some(output_path) = self.output_path {
            config.output_path = output_path;
        }

        // 覆盖LLM配置
        if let Some(provider_str) = self.llm_provider {
            config.llm.provider = provider_str
                .parse::<LLMProvider>()
                .map_err(anyhow::Error::msg)
                .context("Invalid --llm-provider")?;
        }
        if let Some(model) = self.model {
            config.llm.model = model;
        }
        if let Some(llm_api_base_url) = self.llm_api_base_url {
            config.llm.api_base_url = Some(llm_api_base_url);
        }
        if let Some(llm_api_key) = self.llm_api_key {
            config.llm.api_key = llm_api_key;
        }
        if let Some(max_parallels) = self.max_parallels {
            config.llm.max_parallels = max_parallels;
        }

        // 调研流程配置
        if let Some(max_followup_questions) = self.max_followup_questions {
            config.research.max_followup_questions = max_followup_questions;
        }
        if let Some(search_count) = self.search_count {
            config.research.search_count = search_count;
        }
        if let Some(stage_timeout) = self.stage_timeout {
            config.research.stage_timeout_seconds = Some(stage_timeout);
        }

        if self.email {
            config.email.enabled = true;
        }
        config.verbose = config.verbose || self.verbose;

        config.validate()?;
        Ok(config)
    }
}

// Include tests
#[cfg(test)]
mod tests;
