//! Newline-delimited stdio transport.
//!
//! Requests are handled strictly one line at a time. Lines that do not parse
//! as a request object, including lines that are not valid UTF-8, get no
//! reply at all.

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

use crate::protocol::JsonRpcRequest;
use crate::server::GithubMcpServer;

/// Serve requests from `reader` until it reaches EOF, writing one response
/// line per parsed request to `writer`.
pub async fn serve<R, W>(server: &GithubMcpServer, reader: R, mut writer: W) -> std::io::Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }

        let line = trim_line_end(&buf);
        if line.is_empty() {
            continue;
        }

        let Some(request) = JsonRpcRequest::parse_line(line) else {
            tracing::debug!(len = line.len(), "Dropping unparsable line");
            continue;
        };

        let response = server.handle_request(request).await;
        let mut payload = match serde_json::to_vec(&response) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode response");
                continue;
            }
        };
        payload.push(b'\n');
        writer.write_all(&payload).await?;
        writer.flush().await?;
    }

    tracing::info!("Input closed, shutting down");
    Ok(())
}

fn trim_line_end(mut line: &[u8]) -> &[u8] {
    while let [rest @ .., b'\n' | b'\r'] = line {
        line = rest;
    }
    line
}
