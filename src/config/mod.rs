use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

/// 默认配置文件名，位于当前工作目录
pub const DEFAULT_CONFIG_FILE: &str = "deepresearch.toml";

/// LLM Provider类型
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub enum LLMProvider {
    #[serde(rename = "openai")]
    #[default]
    OpenAI,
    #[serde(rename = "anthropic")]
    Anthropic,
    #[serde(rename = "deepseek")]
    DeepSeek,
    #[serde(rename = "openrouter")]
    OpenRouter,
    #[serde(rename = "ollama")]
    Ollama,
}

impl std::fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMProvider::OpenAI => write!(f, "openai"),
            LLMProvider::Anthropic => write!(f, "anthropic"),
            LLMProvider::DeepSeek => write!(f, "deepseek"),
            LLMProvider::OpenRouter => write!(f, "openrouter"),
            LLMProvider::Ollama => write!(f, "ollama"),
        }
    }
}

impl LLMProvider {
    /// 各provider官方API的默认地址
    pub fn default_base_url(&self) -> &'static str {
        match self {
            LLMProvider::OpenAI => "https://api.openai.com/v1",
            LLMProvider::Anthropic => "https://api.anthropic.com",
            LLMProvider::DeepSeek => "https://api.deepseek.com",
            LLMProvider::OpenRouter => "https://openrouter.ai/api/v1",
            LLMProvider::Ollama => "http://localhost:11434",
        }
    }
}

impl std::str::FromStr for LLMProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(LLMProvider::OpenAI),
            "anthropic" => Ok(LLMProvider::Anthropic),
            "deepseek" => Ok(LLMProvider::DeepSeek),
            "openrouter" => Ok(LLMProvider::OpenRouter),
            "ollama" => Ok(LLMProvider::Ollama),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

/// 应用程序配置，进程启动时读取一次
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct Config {
    /// 调研流程配置
    pub research: ResearchConfig,

    /// LLM模型配置
    pub llm: LLMConfig,

    /// 邮件投递配置
    pub email: EmailConfig,

    /// 报告输出路径
    pub output_path: PathBuf,

    /// 是否启用详细日志
    pub verbose: bool,
}

/// 调研流程配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ResearchConfig {
    /// 澄清问题的最大数量
    pub max_followup_questions: usize,

    /// 每次调研规划的搜索次数
    pub search_count: usize,

    /// 单个阶段的超时时间（秒），为空时不限制
    pub stage_timeout_seconds: Option<u64>,
}

/// LLM模型配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LLMConfig {
    /// LLM Provider类型
    pub provider: LLMProvider,

    /// LLM API KEY
    pub api_key: String,

    /// LLM API基地址，为空时使用provider的默认地址
    pub api_base_url: Option<String>,

    /// 所有智能体共用的模型
    pub model: String,

    /// 最大tokens
    pub max_tokens: u32,

    /// 温度
    pub temperature: f64,

    /// 每次调用的尝试次数，1表示不重试
    pub retry_attempts: u32,

    /// 重试间隔（毫秒）
    pub retry_delay_ms: u64,

    /// 搜索阶段的最大并发数，1表示顺序执行
    pub max_parallels: usize,

    /// 每次网页搜索返回的结果条数
    pub search_results: usize,

    /// 带工具对话的最大轮次
    pub max_tool_turns: usize,
}

impl LLMConfig {
    /// 实际请求的API地址
    pub fn base_url(&self) -> &str {
        match self.api_base_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => url,
            _ => self.provider.default_base_url(),
        }
    }
}

/// 邮件投递配置（Brevo事务邮件）
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct EmailConfig {
    /// 是否在报告生成后发送邮件
    pub enabled: bool,

    /// Brevo API KEY
    pub api_key: String,

    pub api_base_url: String,

    pub sender_email: String,

    pub sender_name: String,

    pub recipient_email: String,

    pub recipient_name: String,
}

impl Config {
    /// 从文件加载配置
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let mut file =
            File::open(path).context(format!("Failed to open config file: {:?}", path))?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// 加载配置：显式路径优先，其次是当前目录下的默认配置文件，最后使用默认值
    pub fn load(path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        let default_config_path = std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(DEFAULT_CONFIG_FILE);

        if default_config_path.exists() {
            Self::from_file(&default_config_path)
        } else {
            Ok(Config::default())
        }
    }

    /// 校验配置的一致性
    pub fn validate(&self) -> Result<()> {
        if self.research.search_count == 0 {
            bail!("research.search_count must be at least 1");
        }
        if self.llm.max_parallels == 0 {
            bail!("llm.max_parallels must be at least 1");
        }
        if self.llm.retry_attempts == 0 {
            bail!("llm.retry_attempts must be at least 1");
        }
        if self.llm.model.trim().is_empty() {
            bail!("llm.model must not be empty");
        }
        if self.email.enabled {
            let missing: Vec<&str> = [
                ("email.api_key (BREVO_API_KEY)", &self.email.api_key),
                ("email.sender_email (SENDER_EMAIL)", &self.email.sender_email),
                (
                    "email.recipient_email (RECEIVER_EMAIL)",
                    &self.email.recipient_email,
                ),
            ]
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();

            if !missing.is_empty() {
                bail!(
                    "email delivery is enabled but {} is not set",
                    missing.join(", ")
                );
            }
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            research: ResearchConfig::default(),
            llm: LLMConfig::default(),
            email: EmailConfig::default(),
            output_path: PathBuf::from("./research.docs"),
            verbose: false,
        }
    }
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            max_followup_questions: 5,
            search_count: 3,
            stage_timeout_seconds: None,
        }
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: LLMProvider::default(),
            api_key: std::env::var("DEEPRESEARCH_LLM_API_KEY")
                .or_else(|_| std::env::var("OPENAI_API_KEY"))
                .unwrap_or_default(),
            api_base_url: None,
            model: String::from("gpt-4o-mini"),
            max_tokens: 16384,
            temperature: 0.3,
            retry_attempts: 1,
            retry_delay_ms: 5000,
            max_parallels: 3,
            search_results: 5,
            max_tool_turns: 5,
        }
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: std::env::var("BREVO_API_KEY").unwrap_or_default(),
            api_base_url: String::from("https://api.brevo.com"),
            sender_email: std::env::var("SENDER_EMAIL").unwrap_or_default(),
            sender_name: String::from("Deep Research"),
            recipient_email: std::env::var("RECEIVER_EMAIL").unwrap_or_default(),
            recipient_name: String::from("Reader"),
        }
    }
}
