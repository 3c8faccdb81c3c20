//! 调研流程的错误类型

use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

use crate::generator::session::{Phase, SessionId};

/// 调研流程中可能出现的错误
#[derive(Error, Debug, Clone)]
pub enum ResearchError {
    /// 模型调用失败，或返回的结构化结果无法解析
    #[error("generation failed in {stage}: {message}")]
    Generation { stage: String, message: String },

    /// 某个搜索指令未能完成
    #[error("search failed for \"{query}\": {message}")]
    Search { query: String, message: String },

    /// 阶段执行超时
    #[error("{stage} timed out after {limit:?}")]
    Timeout { stage: String, limit: Duration },

    /// 调用方提供的输入不合法
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// 会话当前阶段不接受该操作
    #[error("cannot {action} while the session is {actual}")]
    InvalidPhase { action: &'static str, actual: Phase },

    #[error("session {0} not found")]
    SessionNotFound(SessionId),
}

impl ResearchError {
    pub fn generation(stage: &str, err: impl std::fmt::Display) -> Self {
        ResearchError::Generation {
            stage: stage.to_string(),
            message: err.to_string(),
        }
    }

    pub fn search(query: &str, err: impl std::fmt::Display) -> Self {
        ResearchError::Search {
            query: query.to_string(),
            message: err.to_string(),
        }
    }
}

/// 邮件投递失败
///
/// 以值的形式返回而不是向上传播，投递失败不影响已经生成的报告。
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("email delivery failed{}: {message}", .status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default())]
pub struct NotifyFailure {
    /// 邮件服务返回的HTTP状态码，传输层错误时为空
    pub status: Option<u16>,
    pub message: String,
}

impl NotifyFailure {
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self {
            status: None,
            message: err.to_string(),
        }
    }
}

pub type Result<T, E = ResearchError> = std::result::Result<T, E>;
