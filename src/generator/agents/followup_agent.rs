use async_trait::async_trait;
use std::sync::Arc;

use super::QuestionGenerator;
use crate::error::{ResearchError, Result};
use crate::llm::LanguageModel;
use crate::types::{ClarificationQuestion, FollowUpQuestions};

/// 澄清问题生成器 - 在调研开始前找出主题中含糊的部分
pub struct FollowupAgent<M> {
    model: Arc<M>,
    max_questions: usize,
}

impl<M: LanguageModel> FollowupAgent<M> {
    pub const STAGE: &'static str = "followup";

    pub fn new(model: Arc<M>, max_questions: usize) -> Self {
        Self {
            model,
            max_questions,
        }
    }

    fn system_prompt(&self) -> String {
        format!(include_str!("prompts/followup_sys.tpl"), self.max_questions)
    }
}

#[async_trait]
impl<M: LanguageModel> QuestionGenerator for FollowupAgent<M> {
    async fn generate(&self, topic: &str) -> Result<Vec<ClarificationQuestion>> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(ResearchError::InvalidInput(
                "research topic must not be empty".to_string(),
            ));
        }
        if self.max_questions == 0 {
            return Ok(Vec::new());
        }

        let output: FollowUpQuestions = self
            .model
            .extract(&self.system_prompt(), topic)
            .await
            .map_err(|e| ResearchError::generation(Self::STAGE, e))?;

        let questions: Vec<ClarificationQuestion> = output
            .questions
            .into_iter()
            .map(|q| ClarificationQuestion::new(q.question.trim()))
            .filter(|q| !q.question.is_empty())
            .take(self.max_questions)
            .collect();

        tracing::debug!(count = questions.len(), "clarification questions generated");
        Ok(questions)
    }
}
