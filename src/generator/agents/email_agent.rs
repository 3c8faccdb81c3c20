//! 邮件投递：将报告排版为HTML并通过Brevo事务邮件接口发送

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::Notifier;
use crate::config::EmailConfig;
use crate::error::NotifyFailure;
use crate::types::{DeliveryReceipt, Report};
use crate::utils::text::{escape_html, first_heading};

pub const DEFAULT_SUBJECT: &str = "Deep Research Report";

/// 邮件地址与显示名称
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mailbox {
    pub name: String,
    pub email: String,
}

impl Mailbox {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// 一封待发送的邮件，序列化后即Brevo的请求体
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailMessage {
    pub sender: Mailbox,
    pub to: Vec<Mailbox>,
    pub subject: String,
    pub html_content: String,
    pub text_content: String,
}

/// 排版后的邮件内容
#[derive(Debug, Clone, PartialEq)]
pub struct EmailContent {
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// 事务邮件通道，成功时返回服务端的消息ID
#[async_trait]
pub trait EmailTransport: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<Option<String>, NotifyFailure>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BrevoSendResponse {
    message_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BrevoErrorResponse {
    message: String,
}

/// Brevo事务邮件接口
#[derive(Debug, Clone)]
pub struct BrevoTransport {
    http: reqwest::Client,
    api_base_url: String,
    api_key: String,
}

impl BrevoTransport {
    pub fn new(api_base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base_url: api_base_url.into(),
            api_key: api_key.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/v3/smtp/email", self.api_base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl EmailTransport for BrevoTransport {
    async fn send(&self, message: &EmailMessage) -> Result<Option<String>, NotifyFailure> {
        let response = self
            .http
            .post(self.endpoint())
            .header("api-key", &self.api_key)
            .header("accept", "application/json")
            .json(message)
            .send()
            .await
            .map_err(NotifyFailure::transport)?;

        let status = response.status();
        let body = response.text().await.map_err(NotifyFailure::transport)?;

        if !status.is_success() {
            let message = serde_json::from_str::<BrevoErrorResponse>(&body)
                .map(|e| e.message)
                .unwrap_or(body);
            return Err(NotifyFailure {
                status: Some(status.as_u16()),
                message,
            });
        }

        Ok(serde_json::from_str::<BrevoSendResponse>(&body)
            .ok()
            .and_then(|r| r.message_id))
    }
}

/// 将报告排版为邮件：标题取报告的第一个标题，正文为摘要、报告HTML与后续研究方向
pub fn format_report_email(report: &Report) -> EmailContent {
    let subject =
        first_heading(&report.markdown_body).unwrap_or_else(|| DEFAULT_SUBJECT.to_string());

    let mut html = String::from("<html><body>\n");
    html.push_str(&format!(
        "<p><em>{}</em></p>\n",
        escape_html(&report.short_summary)
    ));
    html.push_str(&markdown::to_html(&report.markdown_body));
    if !report.follow_up_topics.is_empty() {
        html.push_str("\n<h2>Suggested Follow-up Questions</h2>\n<ol>\n");
        for topic in &report.follow_up_topics {
            html.push_str(&format!("<li>{}</li>\n", escape_html(topic)));
        }
        html.push_str("</ol>\n");
    }
    html.push_str("</body></html>\n");

    EmailContent {
        subject,
        html,
        text: report.markdown_body.clone(),
    }
}

/// 邮件投递者 - 每次调用发送一封邮件
pub struct EmailAgent<T> {
    transport: T,
    sender: Mailbox,
    recipient: Mailbox,
}

impl<T: EmailTransport> EmailAgent<T> {
    pub fn new(transport: T, sender: Mailbox, recipient: Mailbox) -> Self {
        Self {
            transport,
            sender,
            recipient,
        }
    }
}

impl EmailAgent<BrevoTransport> {
    pub fn from_config(config: &EmailConfig) -> Self {
        Self::new(
            BrevoTransport::new(&config.api_base_url, &config.api_key),
            Mailbox::new(&config.sender_name, &config.sender_email),
            Mailbox::new(&config.recipient_name, &config.recipient_email),
        )
    }
}

#[async_trait]
impl<T: EmailTransport> Notifier for EmailAgent<T> {
    async fn notify(&self, report: &Report) -> Result<DeliveryReceipt, NotifyFailure> {
        let content = format_report_email(report);
        let message = EmailMessage {
            sender: self.sender.clone(),
            to: vec![self.recipient.clone()],
            subject: content.subject,
            html_content: content.html,
            text_content: content.text,
        };

        println!("   📧 Sending the report to {}...", self.recipient.email);
        match self.transport.send(&message).await {
            Ok(message_id) => Ok(DeliveryReceipt {
                message_id,
                recipient: self.recipient.email.clone(),
                delivered_at: Utc::now(),
            }),
            Err(failure) => {
                tracing::warn!(error = %failure, "report email was not delivered");
                Err(failure)
            }
        }
    }
}
