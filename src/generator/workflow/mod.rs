//! 面向用户的交互流程：两步表单与对话循环

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::config::Config;
use crate::generator::context::GeneratorContext;
use crate::generator::outlet::DiskOutlet;

pub mod chat;
pub mod form;

pub use form::FormInput;

/// 交互方式
#[derive(Debug, Clone, PartialEq)]
pub enum Surface {
    /// 两步表单：先提交主题，再提交澄清并执行调研
    Form(FormInput),
    /// 对话循环，由会话状态决定每一轮的含义
    Chat,
}

/// 启动调研工作流
pub async fn launch(config: &Config, surface: Surface) -> Result<()> {
    let context = GeneratorContext::new(config.clone())?;

    // 启动时检查模型连接
    context.llm_client.check_connection().await?;

    let coordinator = context.build_coordinator();
    let outlet = DiskOutlet::new(&config.output_path);

    let mut reader = BufReader::new(tokio::io::stdin());
    let mut writer = tokio::io::stdout();

    match surface {
        Surface::Form(input) => {
            form::run(&coordinator, &outlet, input, &mut reader, &mut writer).await?;
        }
        Surface::Chat => {
            chat::run(&coordinator, &outlet, &mut reader, &mut writer).await?;
        }
    }

    Ok(())
}

/// 读取一行输入，输入结束时返回None
pub(crate) async fn read_line<R>(reader: &mut R) -> Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = String::new();
    if reader.read_line(&mut line).await? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

pub(crate) async fn write_text<W>(writer: &mut W, text: &str) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(text.as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}
