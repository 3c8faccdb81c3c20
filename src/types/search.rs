use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// 搜索指令
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct SearchDirective {
    /// The search term to use for the web search.
    pub query: String,
    /// Your reasoning for why this search is important to the query.
    #[serde(alias = "reason")]
    pub rationale: String,
}

impl SearchDirective {
    pub fn new(query: impl Into<String>, rationale: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            rationale: rationale.into(),
        }
    }
}

/// 搜索规划结果
#[derive(Debug, Serialize, Deserialize, Clone, Default, JsonSchema)]
pub struct WebSearchPlan {
    /// A list of web searches to perform to best answer the query.
    pub searches: Vec<SearchDirective>,
}

/// 单次搜索的摘要，与产生它的搜索指令一一对应，不做持久化
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SearchDigest {
    /// 产生该摘要的搜索词
    pub query: String,
    pub summary: String,
}

impl SearchDigest {
    pub fn word_count(&self) -> usize {
        self.summary.split_whitespace().count()
    }
}
