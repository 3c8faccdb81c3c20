use async_trait::async_trait;
use std::sync::Arc;

use super::SearchPlanner;
use crate::error::{ResearchError, Result};
use crate::llm::LanguageModel;
use crate::types::{SearchDirective, WebSearchPlan};

/// 搜索规划器 - 为调研问题给出固定数量的搜索指令
pub struct PlannerAgent<M> {
    model: Arc<M>,
    search_count: usize,
}

impl<M: LanguageModel> PlannerAgent<M> {
    pub const STAGE: &'static str = "planner";

    pub fn new(model: Arc<M>, search_count: usize) -> Self {
        Self {
            model,
            search_count,
        }
    }

    /// 校验规划结果：数量不足或字段为空视为生成失败，多余的指令被截断
    fn validate(&self, plan: WebSearchPlan) -> Result<Vec<SearchDirective>> {
        let directives: Vec<SearchDirective> = plan
            .searches
            .into_iter()
            .take(self.search_count)
            .map(|d| SearchDirective::new(d.query.trim(), d.rationale.trim()))
            .collect();

        if directives.len() < self.search_count {
            return Err(ResearchError::generation(
                Self::STAGE,
                format!(
                    "expected {} searches but the plan contains {}",
                    self.search_count,
                    directives.len()
                ),
            ));
        }

        if let Some(index) = directives
            .iter()
            .position(|d| d.query.is_empty() || d.rationale.is_empty())
        {
            return Err(ResearchError::generation(
                Self::STAGE,
                format!("search #{} has an empty query or reason", index + 1),
            ));
        }

        Ok(directives)
    }
}

#[async_trait]
impl<M: LanguageModel> SearchPlanner for PlannerAgent<M> {
    async fn plan(&self, query: &str) -> Result<Vec<SearchDirective>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ResearchError::InvalidInput(
                "research query must not be empty".to_string(),
            ));
        }

        let system_prompt = format!(include_str!("prompts/planner_sys.tpl"), self.search_count);
        let plan: WebSearchPlan = self
            .model
            .extract(&system_prompt, query)
            .await
            .map_err(|e| ResearchError::generation(Self::STAGE, e))?;

        let directives = self.validate(plan)?;
        for directive in &directives {
            tracing::debug!(query = %directive.query, reason = %directive.rationale, "search planned");
        }
        Ok(directives)
    }
}
