use async_trait::async_trait;
use std::sync::Arc;

use super::ReportComposer;
use crate::error::{ResearchError, Result};
use crate::llm::LanguageModel;
use crate::types::{Report, SearchDigest};

/// 报告撰写者 - 先列提纲，再展开成完整的markdown报告
pub struct WriterAgent<M> {
    model: Arc<M>,
}

impl<M: LanguageModel> WriterAgent<M> {
    pub const STAGE: &'static str = "writer";

    pub fn new(model: Arc<M>) -> Self {
        Self { model }
    }

    fn build_user_prompt(query: &str, digests: &[SearchDigest]) -> String {
        let results = digests
            .iter()
            .enumerate()
            .map(|(i, digest)| format!("### Search {}: {}\n{}", i + 1, digest.query, digest.summary))
            .collect::<Vec<_>>()
            .join("\n\n");

        format!(include_str!("prompts/writer_user.tpl"), query, results)
    }
}

#[async_trait]
impl<M: LanguageModel> ReportComposer for WriterAgent<M> {
    async fn compose(&self, query: &str, digests: &[SearchDigest]) -> Result<Report> {
        println!("   ✍️ Writing the report from {} search summaries...", digests.len());

        let report: Report = self
            .model
            .extract(
                include_str!("prompts/writer_sys.tpl"),
                &Self::build_user_prompt(query, digests),
            )
            .await
            .map_err(|e| ResearchError::generation(Self::STAGE, e))?;

        let report = Report {
            short_summary: report.short_summary.trim().to_string(),
            markdown_body: report.markdown_body.trim().to_string(),
            follow_up_topics: report
                .follow_up_topics
                .into_iter()
                .map(|topic| topic.trim().to_string())
                .filter(|topic| !topic.is_empty())
                .collect(),
        };

        if report.short_summary.is_empty() {
            return Err(ResearchError::generation(Self::STAGE, "the report has no summary"));
        }
        if report.markdown_body.is_empty() {
            return Err(ResearchError::generation(Self::STAGE, "the report body is empty"));
        }

        tracing::debug!(
            words = report.markdown_body.split_whitespace().count(),
            follow_ups = report.follow_up_topics.len(),
            "report composed"
        );
        Ok(report)
    }
}
