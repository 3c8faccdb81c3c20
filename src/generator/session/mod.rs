//! 会话状态：每个会话独立持有一份RunState，多个会话之间互不影响

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{ResearchError, Result};
use crate::types::ClarificationQuestion;

pub mod coordinator;

pub use coordinator::PipelineCoordinator;

/// 会话标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 会话所处的阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    AwaitingTopic,
    AwaitingClarification,
    Running,
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::AwaitingTopic => write!(f, "awaiting a topic"),
            Phase::AwaitingClarification => write!(f, "awaiting clarification"),
            Phase::Running => write!(f, "running"),
            Phase::Done => write!(f, "done"),
        }
    }
}

/// 单个会话的调研状态，每提交一个新主题就重新创建
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunState {
    pub topic: String,
    pub questions: Vec<ClarificationQuestion>,
    pub clarification_answers: Option<String>,
    pub phase: Phase,
}

impl RunState {
    /// 收到新主题后的状态
    pub fn with_topic(topic: &str, questions: Vec<ClarificationQuestion>) -> Self {
        Self {
            topic: topic.to_string(),
            questions,
            clarification_answers: None,
            phase: Phase::AwaitingClarification,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionEntry {
    pub state: RunState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 以会话ID为键的状态存储
///
/// 锁只在读写状态的瞬间持有，不会跨越任何阶段调用。
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<SessionId, SessionEntry>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建新会话，初始阶段为等待主题
    pub async fn open(&self) -> SessionId {
        let id = SessionId::new();
        let now = Utc::now();
        self.inner.write().await.insert(
            id,
            SessionEntry {
                state: RunState::default(),
                created_at: now,
                updated_at: now,
            },
        );
        id
    }

    pub async fn get(&self, id: SessionId) -> Result<RunState> {
        self.inner
            .read()
            .await
            .get(&id)
            .map(|entry| entry.state.clone())
            .ok_or(ResearchError::SessionNotFound(id))
    }

    /// 在写锁内修改会话状态；`apply`返回错误时状态保持不变
    pub async fn update<T, F>(&self, id: SessionId, apply: F) -> Result<T>
    where
        F: FnOnce(&mut RunState) -> Result<T>,
    {
        let mut sessions = self.inner.write().await;
        let entry = sessions
            .get_mut(&id)
            .ok_or(ResearchError::SessionNotFound(id))?;

        let mut next = entry.state.clone();
        let output = apply(&mut next)?;
        entry.state = next;
        entry.updated_at = Utc::now();
        Ok(output)
    }

    pub async fn remove(&self, id: SessionId) -> Result<()> {
        self.inner
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(ResearchError::SessionNotFound(id))
    }

    pub async fn count(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn ids(&self) -> Vec<SessionId> {
        self.inner.read().await.keys().copied().collect()
    }
}

/// 将主题与用户的澄清回答拼接成一个调研问题
pub fn combine_query_with_followups(topic: &str, answers: &str) -> String {
    let topic = topic.trim();
    let answers = answers.trim();
    if answers.is_empty() {
        topic.to_string()
    } else {
        format!("{}\n\nAdditional context from the user:\n{}", topic, answers)
    }
}
