//! stdio transport: newline-delimited JSON-RPC on stdin/stdout
//!
//! stdout carries protocol messages only; logs must go to stderr.

use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info};

use super::handler::McpHandler;
use crate::error::Result;

/// Serve on the process's stdin/stdout until stdin closes
pub async fn serve_stdio(handler: McpHandler) -> Result<()> {
    info!("MCP server listening on stdio");
    serve_io(handler, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await
}

/// Serve over any line-oriented reader/writer pair.
///
/// Each message runs on its own task; replies are written in completion
/// order by a single writer.
pub async fn serve_io<R, W>(handler: McpHandler, reader: R, mut writer: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let (tx, mut rx) = mpsc::channel::<Value>(64);

    let read = async move {
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            let line = line.trim().to_string();
            if line.is_empty() {
                continue;
            }

            let handler = handler.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                if let Some(reply) = handler.handle_message(&line).await {
                    let _ = tx.send(reply).await;
                }
            });
        }
        debug!("stdin closed");
        Ok::<_, crate::Error>(())
    };

    // Ends once the reader and every in-flight request have dropped their senders
    let write = async {
        while let Some(reply) = rx.recv().await {
            let mut out = serde_json::to_string(&reply)?;
            out.push('\n');
            writer.write_all(out.as_bytes()).await?;
            writer.flush().await?;
        }
        Ok::<_, crate::Error>(())
    };

    tokio::try_join!(read, write)?;
    Ok(())
}
