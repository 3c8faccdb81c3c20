use std::sync::Arc;

use super::{Phase, RunState, SessionId, SessionStore, combine_query_with_followups};
use crate::error::{ResearchError, Result};
use crate::generator::agents::QuestionGenerator;
use crate::generator::pipeline::{ResearchPipeline, RunReport};
use crate::types::ClarificationQuestion;

/// 流程协调器 - 按会话驱动 等待主题 → 等待澄清 → 调研中 → 完成 的状态流转
pub struct PipelineCoordinator {
    questions: Arc<dyn QuestionGenerator>,
    pipeline: ResearchPipeline,
    sessions: SessionStore,
}

impl PipelineCoordinator {
    pub fn new(questions: Arc<dyn QuestionGenerator>, pipeline: ResearchPipeline) -> Self {
        Self {
            questions,
            pipeline,
            sessions: SessionStore::new(),
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub async fn open_session(&self) -> SessionId {
        let id = self.sessions.open().await;
        tracing::debug!(session = %id, "session opened");
        id
    }

    pub async fn close_session(&self, id: SessionId) -> Result<()> {
        self.sessions.remove(id).await?;
        tracing::debug!(session = %id, "session closed");
        Ok(())
    }

    pub async fn phase(&self, id: SessionId) -> Result<Phase> {
        Ok(self.sessions.get(id).await?.phase)
    }

    pub async fn state(&self, id: SessionId) -> Result<RunState> {
        self.sessions.get(id).await
    }

    /// 提交调研主题并返回澄清问题
    ///
    /// 调研进行中时拒绝；其他阶段提交都会以新的RunState重新开始。
    pub async fn submit_topic(
        &self,
        id: SessionId,
        topic: &str,
    ) -> Result<Vec<ClarificationQuestion>> {
        const ACTION: &str = "submit a new topic";

        let topic = topic.trim();
        if topic.is_empty() {
            return Err(ResearchError::InvalidInput(
                "research topic must not be empty".to_string(),
            ));
        }
        ensure_not_running(self.phase(id).await?, ACTION)?;

        tracing::info!(session = %id, topic, "topic submitted");
        let questions = match self.questions.generate(topic).await {
            Ok(questions) => questions,
            Err(err) => {
                // 失败后回到等待主题
                self.sessions
                    .update(id, |state| {
                        ensure_not_running(state.phase, ACTION)?;
                        *state = RunState::default();
                        Ok(())
                    })
                    .await
                    .ok();
                return Err(err);
            }
        };

        self.sessions
            .update(id, |state| {
                ensure_not_running(state.phase, ACTION)?;
                *state = RunState::with_topic(topic, questions.clone());
                Ok(())
            })
            .await?;

        Ok(questions)
    }

    /// 提交澄清回答（可以为空）并执行调研
    ///
    /// 调研结束后无论成败，会话都进入完成阶段。
    pub async fn submit_clarification(&self, id: SessionId, answers: &str) -> Result<RunReport> {
        let query = self
            .sessions
            .update(id, |state| {
                if state.phase != Phase::AwaitingClarification {
                    return Err(ResearchError::InvalidPhase {
                        action: "submit a clarification",
                        actual: state.phase,
                    });
                }
                state.clarification_answers = Some(answers.trim().to_string());
                state.phase = Phase::Running;
                Ok(combine_query_with_followups(&state.topic, answers))
            })
            .await?;

        tracing::info!(session = %id, "research run started");
        let outcome = self.pipeline.run(&query).await;

        match &outcome {
            Ok(_) => tracing::info!(session = %id, "research run finished"),
            Err(err) => tracing::warn!(session = %id, error = %err, "research run failed"),
        }

        // 会话可能已在调研期间被关闭
        if let Err(err) = self
            .sessions
            .update(id, |state| {
                state.phase = Phase::Done;
                Ok(())
            })
            .await
        {
            tracing::debug!(session = %id, error = %err, "session gone before the run finished");
        }

        outcome
    }
}

fn ensure_not_running(phase: Phase, action: &'static str) -> Result<()> {
    if phase == Phase::Running {
        return Err(ResearchError::InvalidPhase {
            action,
            actual: phase,
        });
    }
    Ok(())
}
