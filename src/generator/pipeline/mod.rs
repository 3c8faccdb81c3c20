//! 调研流水线：规划 → 并行搜索 → 撰写 → 可选的邮件投递

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::error::{NotifyFailure, ResearchError, Result};
use crate::generator::agents::{Notifier, ReportComposer, SearchPlanner, WebSearchExecutor};
use crate::generator::timing::{TimingKeys, TimingScope};
use crate::types::{DeliveryReceipt, Report, SearchDirective};
use crate::utils::threads::try_do_parallel_with_limit;

/// 流水线依赖的各个阶段
#[derive(Clone)]
pub struct ResearchStages {
    pub planner: Arc<dyn SearchPlanner>,
    pub searcher: Arc<dyn WebSearchExecutor>,
    pub composer: Arc<dyn ReportComposer>,
    /// 为空时不投递报告
    pub notifier: Option<Arc<dyn Notifier>>,
}

/// 流水线运行参数
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOptions {
    /// 搜索阶段的最大并发数，1表示顺序执行
    pub max_parallels: usize,
    /// 单个阶段的超时时间，为空时不限制
    pub stage_timeout: Option<Duration>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            max_parallels: 1,
            stage_timeout: None,
        }
    }
}

impl PipelineOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_parallels: config.llm.max_parallels,
            stage_timeout: config
                .research
                .stage_timeout_seconds
                .map(Duration::from_secs),
        }
    }
}

/// 一次调研的结果
#[derive(Debug, Clone)]
pub struct RunReport {
    /// 合并了澄清信息后的调研问题
    pub query: String,
    pub directives: Vec<SearchDirective>,
    pub report: Report,
    /// 未启用投递时为空；投递失败不影响报告本身
    pub delivery: Option<std::result::Result<DeliveryReceipt, NotifyFailure>>,
    pub timings: TimingScope,
}

impl RunReport {
    pub fn delivery_failure(&self) -> Option<&NotifyFailure> {
        self.delivery.as_ref().and_then(|d| d.as_ref().err())
    }
}

pub struct ResearchPipeline {
    stages: ResearchStages,
    options: PipelineOptions,
}

impl ResearchPipeline {
    pub fn new(stages: ResearchStages, options: PipelineOptions) -> Self {
        Self { stages, options }
    }

    /// 执行一次完整的调研，任一阶段失败都会终止本次调研
    pub async fn run(&self, query: &str) -> Result<RunReport> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ResearchError::InvalidInput(
                "research query must not be empty".to_string(),
            ));
        }

        let mut timings = TimingScope::new();

        println!("🧭 Planning searches...");
        timings.start_phase(TimingKeys::PLANNING);
        let directives = self
            .within_stage_limit(TimingKeys::PLANNING, self.stages.planner.plan(query))
            .await?;
        timings.end_phase(TimingKeys::PLANNING);
        println!("   ✅ {} searches planned", directives.len());

        println!("🔍 Running {} searches...", directives.len());
        timings.start_phase(TimingKeys::SEARCHING);
        let searches: Vec<_> = directives
            .iter()
            .map(|directive| self.stages.searcher.execute(directive))
            .collect();
        let digests = self
            .within_stage_limit(
                TimingKeys::SEARCHING,
                try_do_parallel_with_limit(searches, self.options.max_parallels),
            )
            .await?;
        timings.end_phase(TimingKeys::SEARCHING);
        println!("   ✅ Searches complete");

        println!("✍️ Writing the report...");
        timings.start_phase(TimingKeys::WRITING);
        let report = self
            .within_stage_limit(
                TimingKeys::WRITING,
                self.stages.composer.compose(query, &digests),
            )
            .await?;
        timings.end_phase(TimingKeys::WRITING);
        println!("   ✅ Report written");

        let delivery = match &self.stages.notifier {
            Some(notifier) => {
                timings.start_phase(TimingKeys::NOTIFYING);
                let delivery = self.deliver(notifier.as_ref(), &report).await;
                timings.end_phase(TimingKeys::NOTIFYING);
                Some(delivery)
            }
            None => None,
        };

        tracing::debug!(timings = %timings.generate_timing_report(), "research run finished");

        Ok(RunReport {
            query: query.to_string(),
            directives,
            report,
            delivery,
            timings,
        })
    }

    /// 投递报告，超时也作为投递失败返回
    async fn deliver(
        &self,
        notifier: &dyn Notifier,
        report: &Report,
    ) -> std::result::Result<DeliveryReceipt, NotifyFailure> {
        println!("📧 Emailing the report...");
        let delivery = match self.options.stage_timeout {
            Some(limit) => tokio::time::timeout(limit, notifier.notify(report))
                .await
                .unwrap_or_else(|_| {
                    Err(NotifyFailure::transport(format!(
                        "timed out after {:?}",
                        limit
                    )))
                }),
            None => notifier.notify(report).await,
        };

        match &delivery {
            Ok(receipt) => println!("   ✅ Report emailed to {}", receipt.recipient),
            Err(failure) => eprintln!("   ⚠️ {}", failure),
        }
        delivery
    }

    async fn within_stage_limit<T, F>(&self, stage: &str, future: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match self.options.stage_timeout {
            Some(limit) => tokio::time::timeout(limit, future)
                .await
                .map_err(|_| ResearchError::Timeout {
                    stage: stage.to_string(),
                    limit,
                })?,
            None => future.await,
        }
    }
}
