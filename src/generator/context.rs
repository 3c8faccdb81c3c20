use std::sync::Arc;

use anyhow::Result;

use crate::config::Config;
use crate::generator::agents::{
    EmailAgent, FollowupAgent, Notifier, PlannerAgent, SearchAgent, WriterAgent,
};
use crate::generator::pipeline::{PipelineOptions, ResearchPipeline, ResearchStages};
use crate::generator::session::PipelineCoordinator;
use crate::llm::client::LLMClient;

#[derive(Clone)]
pub struct GeneratorContext {
    /// LLM调用器，所有智能体共用
    pub llm_client: Arc<LLMClient>,
    /// 配置
    pub config: Config,
}

impl GeneratorContext {
    /// 创建新的生成器上下文
    pub fn new(config: Config) -> Result<Self> {
        let llm_client = Arc::new(LLMClient::new(config.llm.clone())?);
        Ok(Self { llm_client, config })
    }

    /// 按配置组装各个阶段
    pub fn build_stages(&self) -> ResearchStages {
        let notifier: Option<Arc<dyn Notifier>> = if self.config.email.enabled {
            Some(Arc::new(EmailAgent::from_config(&self.config.email)))
        } else {
            None
        };

        ResearchStages {
            planner: Arc::new(PlannerAgent::new(
                self.llm_client.clone(),
                self.config.research.search_count,
            )),
            searcher: Arc::new(SearchAgent::new(self.llm_client.clone())),
            composer: Arc::new(WriterAgent::new(self.llm_client.clone())),
            notifier,
        }
    }

    /// 创建流程协调器
    pub fn build_coordinator(&self) -> PipelineCoordinator {
        let questions = Arc::new(FollowupAgent::new(
            self.llm_client.clone(),
            self.config.research.max_followup_questions,
        ));
        let pipeline = ResearchPipeline::new(
            self.build_stages(),
            PipelineOptions::from_config(&self.config),
        );
        PipelineCoordinator::new(questions, pipeline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notifier_follows_email_toggle() {
        let mut config = Config::default();
        config.llm.api_key = "sk-test".to_string();

        let context = GeneratorContext::new(config.clone()).unwrap();
        assert!(context.build_stages().notifier.is_none());

        config.email.enabled = true;
        let context = GeneratorContext::new(config).unwrap();
        assert!(context.build_stages().notifier.is_some());
    }
}
