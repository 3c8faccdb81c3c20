use anyhow::{Result, bail};
use tokio::io::{AsyncBufRead, AsyncWrite};

use super::{read_line, write_text};
use crate::generator::outlet::{DiskOutlet, Outlet, render_delivery, render_questions, render_report};
use crate::generator::pipeline::RunReport;
use crate::generator::session::{PipelineCoordinator, SessionId};

/// 表单预填的内容，缺失的部分在交互中询问
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormInput {
    pub topic: Option<String>,
    pub clarification: Option<String>,
}

/// 两步表单：主题 → 澄清问题 → 澄清回答 → 报告
pub async fn run<R, W>(
    coordinator: &PipelineCoordinator,
    outlet: &DiskOutlet,
    input: FormInput,
    reader: &mut R,
    writer: &mut W,
) -> Result<RunReport>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let topic = match input.topic {
        Some(topic) => topic,
        None => {
            write_text(writer, "Research topic: ").await?;
            match read_line(reader).await? {
                Some(topic) => topic,
                None => bail!("no research topic was given"),
            }
        }
    };

    // 无论成功与否，表单结束时会话都要关闭
    let id = coordinator.open_session().await;
    let outcome = research(coordinator, id, &topic, input.clarification, reader, writer).await;
    coordinator.close_session(id).await?;
    let run = outcome?;

    outlet.save(&run).await?;
    write_text(writer, &format!("\n{}\n", render_report(&run))).await?;
    if let Some(line) = render_delivery(run.delivery.as_ref()) {
        write_text(writer, &format!("{}\n", line)).await?;
    }

    Ok(run)
}

async fn research<R, W>(
    coordinator: &PipelineCoordinator,
    id: SessionId,
    topic: &str,
    clarification: Option<String>,
    reader: &mut R,
    writer: &mut W,
) -> Result<RunReport>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let questions = coordinator.submit_topic(id, topic).await?;
    write_text(writer, &format!("\n{}\n", render_questions(&questions))).await?;

    let answers = match clarification {
        Some(answers) => answers,
        None => {
            write_text(writer, "> ").await?;
            read_line(reader).await?.unwrap_or_default()
        }
    };

    Ok(coordinator.submit_clarification(id, &answers).await?)
}
