use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// 单个澄清问题
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct ClarificationQuestion {
    /// The text of the follow-up question.
    pub question: String,
}

impl ClarificationQuestion {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
        }
    }
}

/// 澄清问题生成结果，顺序即展示顺序
#[derive(Debug, Serialize, Deserialize, Clone, Default, JsonSchema)]
pub struct FollowUpQuestions {
    /// Follow-up questions that help narrow down the research topic.
    pub questions: Vec<ClarificationQuestion>,
}
