//! 调研流水线的各个阶段
//!
//! 每个阶段是一个trait，协调器只依赖trait对象；基于LLM的实现位于各自的子模块中。

use async_trait::async_trait;

use crate::error::{NotifyFailure, Result};
use crate::types::{ClarificationQuestion, DeliveryReceipt, Report, SearchDigest, SearchDirective};

pub mod email_agent;
pub mod followup_agent;
pub mod planner_agent;
pub mod search_agent;
pub mod writer_agent;

pub use email_agent::{BrevoTransport, EmailAgent, EmailTransport};
pub use followup_agent::FollowupAgent;
pub use planner_agent::PlannerAgent;
pub use search_agent::SearchAgent;
pub use writer_agent::WriterAgent;

/// 根据调研主题生成澄清问题
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    async fn generate(&self, topic: &str) -> Result<Vec<ClarificationQuestion>>;
}

/// 为（澄清后的）调研主题规划搜索指令
#[async_trait]
pub trait SearchPlanner: Send + Sync {
    async fn plan(&self, query: &str) -> Result<Vec<SearchDirective>>;
}

/// 执行单个搜索指令并返回摘要
#[async_trait]
pub trait WebSearchExecutor: Send + Sync {
    async fn execute(&self, directive: &SearchDirective) -> Result<SearchDigest>;
}

/// 根据原始问题与搜索摘要撰写报告
#[async_trait]
pub trait ReportComposer: Send + Sync {
    async fn compose(&self, query: &str, digests: &[SearchDigest]) -> Result<Report>;
}

/// 投递已完成的报告
///
/// 每次调用都会产生一次投递，不做去重。失败以值的形式返回。
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, report: &Report) -> std::result::Result<DeliveryReceipt, NotifyFailure>;
}
