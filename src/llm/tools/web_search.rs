//! 网页搜索工具，基于daedra（DuckDuckGo）

use rig::tool::Tool;
use serde::Deserialize;
use serde_json::{Value, json};

/// 网页搜索工具
#[derive(Debug, Clone)]
pub struct AgentToolWebSearch {
    num_results: usize,
}

/// 搜索参数
#[derive(Debug, Deserialize)]
pub struct WebSearchArgs {
    pub query: String,
    pub num_results: Option<usize>,
}

/// 搜索工具错误
#[derive(Debug, thiserror::Error)]
#[error("web search failed: {0}")]
pub struct WebSearchToolError(String);

impl AgentToolWebSearch {
    pub fn new(num_results: usize) -> Self {
        Self {
            num_results: num_results.max(1),
        }
    }

    /// 模型请求的结果数不超过配置值
    fn result_limit(&self, requested: Option<usize>) -> usize {
        requested.map_or(self.num_results, |n| n.clamp(1, self.num_results))
    }

    async fn search(&self, args: &WebSearchArgs) -> Result<Value, WebSearchToolError> {
        let query = args.query.trim();
        if query.is_empty() {
            return Err(WebSearchToolError("missing 'query' parameter".to_string()));
        }

        let search_args = daedra::SearchArgs {
            query: query.to_string(),
            options: Some(daedra::SearchOptions {
                num_results: self.result_limit(args.num_results),
                ..Default::default()
            }),
        };

        let response = daedra::tools::search::perform_search(&search_args)
            .await
            .map_err(|e| WebSearchToolError(e.to_string()))?;

        let results: Vec<Value> = response
            .data
            .iter()
            .map(|r| {
                json!({
                    "title": r.title,
                    "url": r.url,
                    "description": r.description
                })
            })
            .collect();

        Ok(json!({
            "query": query,
            "results": results,
            "count": results.len()
        }))
    }
}

impl Tool for AgentToolWebSearch {
    const NAME: &'static str = "web_search";

    type Error = WebSearchToolError;
    type Args = WebSearchArgs;
    type Output = Value;

    async fn definition(&self, _prompt: String) -> rig::completion::ToolDefinition {
        rig::completion::ToolDefinition {
            name: Self::NAME.to_string(),
            description: "Search the web and return the title, url and a short description of the top results.".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The search query"
                    },
                    "num_results": {
                        "type": "integer",
                        "description": format!("Maximum number of results to return (default and upper bound: {})", self.num_results)
                    }
                },
                "required": ["query"]
            }),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        println!("   🔧 tool called...web_search@{}", args.query);
        tracing::debug!(query = %args.query, "web search tool invoked");

        self.search(&args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_definition_requires_query() {
        let tool = AgentToolWebSearch::new(5);
        let definition = tool.definition(String::new()).await;

        assert_eq!(definition.name, "web_search");
        assert!(!definition.description.is_empty());
        assert_eq!(definition.parameters["required"], json!(["query"]));
        assert!(
            definition.parameters["properties"]["num_results"]["description"]
                .as_str()
                .unwrap()
                .contains("upper bound: 5")
        );
    }

    #[test]
    fn test_requested_results_are_capped() {
        let tool = AgentToolWebSearch::new(5);
        assert_eq!(tool.result_limit(None), 5);
        assert_eq!(tool.result_limit(Some(3)), 3);
        assert_eq!(tool.result_limit(Some(500)), 5);
        assert_eq!(tool.result_limit(Some(0)), 1);
    }

    #[tokio::test]
    async fn test_blank_query_is_rejected_without_network() {
        let tool = AgentToolWebSearch::new(0);
        assert_eq!(tool.num_results, 1);

        let result = tool
            .call(WebSearchArgs {
                query: "   ".to_string(),
                num_results: None,
            })
            .await;
        assert!(result.is_err());
    }
}
