use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::error::NotifyFailure;
use crate::generator::pipeline::RunReport;
use crate::types::{ClarificationQuestion, DeliveryReceipt};

pub const REPORT_FILE_NAME: &str = "report.md";

pub trait Outlet {
    async fn save(&self, run: &RunReport) -> Result<PathBuf>;
}

/// 将报告写入输出目录
pub struct DiskOutlet {
    output_dir: PathBuf,
}

impl DiskOutlet {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

impl Outlet for DiskOutlet {
    async fn save(&self, run: &RunReport) -> Result<PathBuf> {
        println!("\n🖊️ Saving the report...");
        fs::create_dir_all(&self.output_dir).with_context(|| {
            format!("Failed to create output directory {:?}", self.output_dir)
        })?;

        let path = self.output_dir.join(REPORT_FILE_NAME);
        fs::write(&path, render_report(run))
            .with_context(|| format!("Failed to write report to {:?}", path))?;

        println!("💾 Report saved to {}", path.display());
        Ok(path)
    }
}

/// 渲染澄清问题列表
pub fn render_questions(questions: &[ClarificationQuestion]) -> String {
    if questions.is_empty() {
        return "No clarification needed. Press enter to start the research, or add any extra context.\n"
            .to_string();
    }

    let mut text = String::from("## Clarification Questions\n\n");
    for (i, q) in questions.iter().enumerate() {
        text.push_str(&format!("**{}. {}**\n\n", i + 1, q.question));
    }
    text.push_str("Answer in a single message (leave empty to skip).\n");
    text
}

/// 渲染完整报告：摘要、正文与后续研究方向
pub fn render_report(run: &RunReport) -> String {
    let report = &run.report;
    let mut text = format!("> {}\n\n{}\n", report.short_summary, report.markdown_body);

    if !report.follow_up_topics.is_empty() {
        text.push_str("\n## Suggested Follow-up Questions\n\n");
        for (i, topic) in report.follow_up_topics.iter().enumerate() {
            text.push_str(&format!("**{}. {}**\n\n", i + 1, topic));
        }
    }
    text
}

/// 渲染邮件投递结果，未启用投递时为空
pub fn render_delivery(
    delivery: Option<&std::result::Result<DeliveryReceipt, NotifyFailure>>,
) -> Option<String> {
    delivery.map(|d| match d {
        Ok(receipt) => format!("📧 Report emailed to {}", receipt.recipient),
        Err(failure) => format!("⚠️ The report was not emailed: {}", failure),
    })
}
