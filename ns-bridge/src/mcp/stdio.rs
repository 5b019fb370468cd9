//! Newline-delimited JSON-RPC over stdin/stdout.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::tools::AppState;

/// Serve requests from stdin until EOF.
///
/// stdout carries protocol messages only; logs go to stderr.
pub async fn run_stdio(state: AppState) -> std::io::Result<()> {
    info!("serving MCP over stdio");
    serve_lines(state, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await?;
    info!("stdin closed, shutting down");
    Ok(())
}

/// Serve one JSON-RPC message per input line, writing one response per line.
///
/// Each request runs in its own task, so a slow upstream call does not hold
/// back the requests after it; responses are written in completion order.
/// Returns once the input is exhausted and every in-flight request has
/// been answered.
pub async fn serve_lines<R, W>(state: AppState, mut reader: R, writer: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel::<String>();
    let writer = tokio::spawn(write_responses(rx, writer));

    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            break;
        }

        let request = line.trim().to_string();
        if request.is_empty() {
            continue;
        }
        debug!(request = %request, "received");

        let state = state.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let Some(response) = super::handle_request(&state, &request).await else {
                return;
            };
            match serde_json::to_string(&response) {
                Ok(json) => {
                    // The writer only goes away after every sender is dropped.
                    let _ = tx.send(json);
                }
                Err(e) => error!(error = %e, "failed to serialize response"),
            }
        });
    }

    drop(tx);
    writer.await.map_err(std::io::Error::other)?
}

async fn write_responses<W>(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut writer: W,
) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(response) = rx.recv().await {
        debug!(response = %response, "sending");
        writer.write_all(response.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }
    Ok(())
}
