use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncWrite};

use super::{read_line, write_text};
use crate::generator::outlet::{DiskOutlet, Outlet, render_delivery, render_questions, render_report};
use crate::generator::session::{Phase, PipelineCoordinator};

pub const NEW_SESSION_COMMAND: &str = "/new";
pub const QUIT_COMMAND: &str = "/quit";

/// 对话循环：每一轮输入的含义由当前会话阶段决定
pub async fn run<R, W>(
    coordinator: &PipelineCoordinator,
    outlet: &DiskOutlet,
    reader: &mut R,
    writer: &mut W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut id = coordinator.open_session().await;
    write_text(
        writer,
        &format!(
            "💬 What would you like to research? ({} resets, {} exits)\n",
            NEW_SESSION_COMMAND, QUIT_COMMAND
        ),
    )
    .await?;

    loop {
        let phase = coordinator.phase(id).await?;
        let prompt = match phase {
            Phase::AwaitingClarification => "answers> ",
            _ => "topic> ",
        };
        write_text(writer, prompt).await?;

        let Some(line) = read_line(reader).await? else {
            break;
        };
        let line = line.trim();

        match line {
            QUIT_COMMAND => break,
            NEW_SESSION_COMMAND => {
                coordinator.close_session(id).await?;
                id = coordinator.open_session().await;
                write_text(writer, "🆕 Started a new session\n").await?;
                continue;
            }
            _ => {}
        }

        match phase {
            Phase::AwaitingTopic | Phase::Done => {
                if line.is_empty() {
                    continue;
                }
                match coordinator.submit_topic(id, line).await {
                    Ok(questions) => {
                        write_text(writer, &format!("\n{}\n", render_questions(&questions)))
                            .await?
                    }
                    Err(err) => write_text(writer, &format!("❌ {}\n", err)).await?,
                }
            }
            Phase::AwaitingClarification => match coordinator.submit_clarification(id, line).await {
                Ok(run) => {
                    if let Err(err) = outlet.save(&run).await {
                        write_text(writer, &format!("⚠️ {}\n", err)).await?;
                    }
                    write_text(writer, &format!("\n{}\n", render_report(&run))).await?;
                    if let Some(delivery) = render_delivery(run.delivery.as_ref()) {
                        write_text(writer, &format!("{}\n", delivery)).await?;
                    }
                    write_text(writer, "\n💬 Enter a new topic to start another research.\n")
                        .await?;
                }
                Err(err) => {
                    write_text(
                        writer,
                        &format!("❌ Research failed: {}\n💬 Enter a new topic to try again.\n", err),
                    )
                    .await?
                }
            },
            Phase::Running => {
                write_text(writer, "⏳ The research is still running\n").await?;
            }
        }
    }

    coordinator.close_session(id).await?;
    write_text(writer, "👋 Bye\n").await?;
    Ok(())
}
