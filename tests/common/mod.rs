//! 集成测试共用的模型替身与组装函数

#![allow(dead_code)]

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use deepresearch_rs::generator::agents::{
    FollowupAgent, Notifier, PlannerAgent, SearchAgent, WriterAgent,
};
use deepresearch_rs::generator::pipeline::{PipelineOptions, ResearchPipeline, ResearchStages};
use deepresearch_rs::generator::session::PipelineCoordinator;
use deepresearch_rs::llm::LanguageModel;

/// 按系统提示词区分智能体的模型替身
///
/// 搜索调用可能并发执行，因此不依赖调用顺序。
pub struct MockLanguageModel {
    pub failing_search: Option<String>,
    pub followup_calls: AtomicUsize,
    pub planner_calls: AtomicUsize,
    pub search_calls: AtomicUsize,
    pub writer_calls: AtomicUsize,
    pub planner_inputs: Mutex<Vec<String>>,
}

impl MockLanguageModel {
    pub fn new() -> Self {
        Self {
            failing_search: None,
            followup_calls: AtomicUsize::new(0),
            planner_calls: AtomicUsize::new(0),
            search_calls: AtomicUsize::new(0),
            writer_calls: AtomicUsize::new(0),
            planner_inputs: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_search(query: &str) -> Self {
        Self {
            failing_search: Some(query.to_string()),
            ..Self::new()
        }
    }

    pub fn writer_call_count(&self) -> usize {
        self.writer_calls.load(Ordering::SeqCst)
    }

    pub fn search_call_count(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    fn questions() -> Value {
        json!({
            "questions": [
                {"question": "What timeframe should the research cover, e.g. up to 2030 or 2050?"},
                {"question": "Which European countries or regions matter most to you?"},
                {"question": "Are you interested in technology, policy or investment aspects?"}
            ]
        })
    }

    fn plan(query: &str) -> Value {
        let topic = query.lines().next().unwrap_or_default();
        json!({
            "searches": [
                {"reason": "Capacity trends", "query": format!("{} capacity growth", topic)},
                {"reason": "Policy landscape", "query": format!("{} policy", topic)},
                {"reason": "Investment outlook", "query": format!("{} investment", topic)},
                {"reason": "Extra search that should be dropped", "query": "unused"}
            ]
        })
    }

    fn report(user_prompt: &str) -> Value {
        let query = user_prompt
            .lines()
            .next()
            .unwrap_or_default()
            .trim_start_matches("Original query: ");
        json!({
            "short_summary": format!("Findings about {}.", query),
            "markdown_report": format!("# {}\n\n## Outline\n\n1. Trends\n\n## Trends\n\n{}", query, "Growth continues. ".repeat(50)),
            "follow_up_questions": ["Grid-scale storage", "Cross-border interconnectors"]
        })
    }
}

#[async_trait]
impl LanguageModel for MockLanguageModel {
    async fn extract<T>(&self, system_prompt: &str, user_prompt: &str) -> Result<T>
    where
        T: JsonSchema + for<'a> Deserialize<'a> + Serialize + Send + Sync + 'static,
    {
        let value = if system_prompt.contains("follow-up questions") {
            self.followup_calls.fetch_add(1, Ordering::SeqCst);
            Self::questions()
        } else if system_prompt.contains("web searches") {
            self.planner_calls.fetch_add(1, Ordering::SeqCst);
            self.planner_inputs
                .lock()
                .unwrap()
                .push(user_prompt.to_string());
            Self::plan(user_prompt)
        } else if system_prompt.contains("senior researcher") {
            self.writer_calls.fetch_add(1, Ordering::SeqCst);
            Self::report(user_prompt)
        } else {
            return Err(anyhow!("unexpected extraction request"));
        };
        Ok(serde_json::from_value(value)?)
    }

    async fn prompt(&self, _system_prompt: &str, _user_prompt: &str) -> Result<String> {
        Ok("pong".to_string())
    }

    async fn prompt_with_tools(&self, _system_prompt: &str, user_prompt: &str) -> Result<String> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        let term = user_prompt
            .lines()
            .find_map(|line| line.strip_prefix("Search term: "))
            .unwrap_or_default()
            .to_string();

        if self.failing_search.as_deref() == Some(term.as_str()) {
            return Err(anyhow!("search backend unavailable"));
        }
        Ok(format!(
            "Results for {}.\n\nKey numbers and sources summarized here.",
            term
        ))
    }
}

/// 用真实的智能体和模型替身组装协调器
pub fn build_coordinator(
    model: Arc<MockLanguageModel>,
    notifier: Option<Arc<dyn Notifier>>,
    max_parallels: usize,
) -> PipelineCoordinator {
    let stages = ResearchStages {
        planner: Arc::new(PlannerAgent::new(model.clone(), 3)),
        searcher: Arc::new(SearchAgent::new(model.clone())),
        composer: Arc::new(WriterAgent::new(model.clone())),
        notifier,
    };
    let pipeline = ResearchPipeline::new(
        stages,
        PipelineOptions {
            max_parallels,
            stage_timeout: None,
        },
    );
    PipelineCoordinator::new(Arc::new(FollowupAgent::new(model, 5)), pipeline)
}
