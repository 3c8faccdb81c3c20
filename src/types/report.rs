use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// 调研报告，一次调研的最终产物
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct Report {
    /// A short 2-3 sentence summary of the findings.
    pub short_summary: String,
    /// The final report in markdown format.
    #[serde(alias = "markdown_report")]
    pub markdown_body: String,
    /// Suggested topics to research further.
    #[serde(default, alias = "follow_up_questions")]
    pub follow_up_topics: Vec<String>,
}

/// 邮件投递回执
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DeliveryReceipt {
    /// 邮件服务返回的消息ID
    pub message_id: Option<String>,
    pub recipient: String,
    pub delivered_at: DateTime<Utc>,
}
