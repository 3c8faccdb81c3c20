use async_trait::async_trait;
use std::sync::Arc;

use super::WebSearchExecutor;
use crate::error::{ResearchError, Result};
use crate::llm::LanguageModel;
use crate::types::{SearchDigest, SearchDirective};
use crate::utils::text::truncate_words;

/// 摘要必须少于300个词
pub const MAX_DIGEST_WORDS: usize = 299;

/// 搜索执行器 - 借助网页搜索工具完成一次搜索并压缩成摘要
pub struct SearchAgent<M> {
    model: Arc<M>,
}

impl<M: LanguageModel> SearchAgent<M> {
    pub fn new(model: Arc<M>) -> Self {
        Self { model }
    }

    fn system_prompt(&self) -> String {
        let today = chrono::Local::now().format("%Y-%m-%d").to_string();
        format!(include_str!("prompts/search_sys.tpl"), today)
    }
}

#[async_trait]
impl<M: LanguageModel> WebSearchExecutor for SearchAgent<M> {
    async fn execute(&self, directive: &SearchDirective) -> Result<SearchDigest> {
        println!("   🔍 Searching: {}", directive.query);

        let user_prompt = format!(
            include_str!("prompts/search_user.tpl"),
            directive.query, directive.rationale
        );
        let output = self
            .model
            .prompt_with_tools(&self.system_prompt(), &user_prompt)
            .await
            .map_err(|e| ResearchError::search(&directive.query, e))?;

        let summary = truncate_words(output.trim(), MAX_DIGEST_WORDS);
        if summary.is_empty() {
            return Err(ResearchError::search(
                &directive.query,
                "the search returned an empty summary",
            ));
        }

        Ok(SearchDigest {
            query: directive.query.clone(),
            summary,
        })
    }
}
