//! 测试用的阶段替身

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::error::{NotifyFailure, ResearchError, Result};
use crate::generator::agents::{
    Notifier, QuestionGenerator, ReportComposer, SearchPlanner, WebSearchExecutor,
};
use crate::types::{ClarificationQuestion, DeliveryReceipt, Report, SearchDigest, SearchDirective};

#[derive(Default)]
pub(crate) struct StaticQuestions {
    pub questions: Vec<String>,
    pub fail: bool,
    pub topics: Mutex<Vec<String>>,
}

impl StaticQuestions {
    pub fn new(questions: &[&str]) -> Self {
        Self {
            questions: questions.iter().map(|q| q.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }
}

#[async_trait]
impl QuestionGenerator for StaticQuestions {
    async fn generate(&self, topic: &str) -> Result<Vec<ClarificationQuestion>> {
        self.topics.lock().unwrap().push(topic.to_string());
        if self.fail {
            return Err(ResearchError::generation("followup", "malformed output"));
        }
        Ok(self
            .questions
            .iter()
            .map(ClarificationQuestion::new)
            .collect())
    }
}

pub(crate) struct NumberedPlanner {
    pub count: usize,
    pub queries: Mutex<Vec<String>>,
}

impl NumberedPlanner {
    pub fn new(count: usize) -> Self {
        Self {
            count,
            queries: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl SearchPlanner for NumberedPlanner {
    async fn plan(&self, query: &str) -> Result<Vec<SearchDirective>> {
        self.queries.lock().unwrap().push(query.to_string());
        Ok((1..=self.count)
            .map(|i| SearchDirective::new(format!("search {}", i), format!("reason {}", i)))
            .collect())
    }
}

#[derive(Default)]
pub(crate) struct EchoSearcher {
    pub fail_on: Option<String>,
    pub delay: Option<Duration>,
    pub calls: AtomicUsize,
}

impl EchoSearcher {
    pub fn failing_on(query: &str) -> Self {
        Self {
            fail_on: Some(query.to_string()),
            ..Default::default()
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Default::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WebSearchExecutor for EchoSearcher {
    async fn execute(&self, directive: &SearchDirective) -> Result<SearchDigest> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_on.as_deref() == Some(directive.query.as_str()) {
            return Err(ResearchError::search(&directive.query, "network unreachable"));
        }
        Ok(SearchDigest {
            query: directive.query.clone(),
            summary: format!("findings for {}", directive.query),
        })
    }
}

#[derive(Default)]
pub(crate) struct RecordingComposer {
    pub calls: Mutex<Vec<(String, Vec<SearchDigest>)>>,
}

impl RecordingComposer {
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ReportComposer for RecordingComposer {
    async fn compose(&self, query: &str, digests: &[SearchDigest]) -> Result<Report> {
        self.calls
            .lock()
            .unwrap()
            .push((query.to_string(), digests.to_vec()));
        Ok(Report {
            short_summary: format!("summary of {}", query),
            markdown_body: format!("# Report\n\n{} sources", digests.len()),
            follow_up_topics: vec!["next topic".to_string()],
        })
    }
}

#[derive(Default)]
pub(crate) struct CountingNotifier {
    pub fail: bool,
    pub sends: AtomicUsize,
}

impl CountingNotifier {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn send_count(&self) -> usize {
        self.sends.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Notifier for CountingNotifier {
    async fn notify(&self, _report: &Report) -> std::result::Result<DeliveryReceipt, NotifyFailure> {
        self.sends.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(NotifyFailure {
                status: Some(401),
                message: "Key not found".to_string(),
            });
        }
        Ok(DeliveryReceipt {
            message_id: Some("<test@relay>".to_string()),
            recipient: "reader@example.com".to_string(),
            delivered_at: chrono::Utc::now(),
        })
    }
}
