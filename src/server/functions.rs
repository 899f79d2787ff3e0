// Standard library
use std::sync::Arc;

// 3rd party crates
use futures::stream::{FuturesUnordered, StreamExt};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::{mpsc, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

// Project imports
use crate::provider::BunnyCdnProvider;
use crate::resources::{Diagnostics, ResourceResponse};

// Current module imports
use super::constants::{HANDSHAKE, RESPONSE_BUFFER};
use super::errors::ServerError;
use super::types::{Envelope, HostRequest, HostResponse};

/// Serves host requests read from `reader` until the input ends, a
/// `StopProvider` arrives, or `shutdown` is cancelled.
///
/// Every request runs in its own task with a child token of `shutdown`.
/// Stopping cancels that token and waits for in-flight requests, so their
/// responses still reach `writer`.
pub async fn serve<R, W>(
    provider: BunnyCdnProvider,
    reader: R,
    writer: W,
    shutdown: CancellationToken,
) -> Result<(), ServerError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let provider = Arc::new(RwLock::new(provider));
    let (tx, rx) = mpsc::channel::<HostResponse>(RESPONSE_BUFFER);
    let writer_task = tokio::spawn(write_responses(writer, rx));

    let mut lines = reader.lines();
    let mut in_flight = FuturesUnordered::new();
    let mut read_error: Option<std::io::Error> = None;

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("Shutdown requested, waiting for in-flight requests");
                break;
            }

            Some(joined) = in_flight.next(), if !in_flight.is_empty() => {
                if let Err(e) = joined {
                    error!("Request task failed: {}", e);
                }
            }

            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => {
                        debug!("Host closed the input");
                        shutdown.cancel();
                        break;
                    }
                    Err(e) => {
                        error!("Failed to read from the host: {}", e);
                        shutdown.cancel();
                        read_error = Some(e);
                        break;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }

                let envelope = match parse_envelope(&line) {
                    Ok(envelope) => envelope,
                    Err(response) => {
                        warn!("Rejected malformed request line");
                        if tx.send(response).await.is_err() {
                            break;
                        }
                        continue;
                    }
                };

                if let HostRequest::StopProvider = envelope.request {
                    info!("Host asked the provider to stop");
                    shutdown.cancel();
                    let _ = tx.send(HostResponse::new(envelope.id)).await;
                    break;
                }

                let provider = Arc::clone(&provider);
                let tx = tx.clone();
                let cancel = shutdown.child_token();
                in_flight.push(tokio::spawn(async move {
                    let response = handle_request(&provider, envelope, &cancel).await;
                    if tx.send(response).await.is_err() {
                        warn!("Response writer is gone, dropping response");
                    }
                }));
            }
        }
    }

    while let Some(joined) = in_flight.next().await {
        if let Err(e) = joined {
            error!("Request task failed: {}", e);
        }
    }

    drop(tx);
    let written = writer_task.await?;
    match read_error {
        Some(e) => Err(e.into()),
        None => written,
    }
}

/// Runs the adapter on the process's stdin and stdout.
pub async fn run_stdio(
    provider: BunnyCdnProvider,
    shutdown: CancellationToken,
) -> Result<(), ServerError> {
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    serve(provider, stdin, tokio::io::stdout(), shutdown).await
}

async fn write_responses<W>(
    mut writer: W,
    mut rx: mpsc::Receiver<HostResponse>,
) -> Result<(), ServerError>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(HANDSHAKE.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;

    while let Some(response) = rx.recv().await {
        let mut line = serde_json::to_vec(&response)?;
        line.push(b'\n');
        writer.write_all(&line).await?;
        writer.flush().await?;
    }
    Ok(())
}

/// Parses one request line, or builds the error response for it.
///
/// The id is recovered from lines that are valid JSON but not a valid
/// request, so the host can still match the failure.
fn parse_envelope(line: &str) -> Result<Envelope, HostResponse> {
    let mut diagnostics = Diagnostics::new();

    let value: Value = match serde_json::from_str(line) {
        Ok(value) => value,
        Err(e) => {
            diagnostics.add_error("Invalid Request", format!("Request is not valid JSON: {}", e));
            return Err(HostResponse::with_diagnostics(None, diagnostics));
        }
    };

    let id = value.get("id").and_then(Value::as_u64);
    serde_json::from_value(value).map_err(|e| {
        diagnostics.add_error("Invalid Request", format!("Unable to decode request: {}", e));
        HostResponse::with_diagnostics(id, diagnostics)
    })
}

fn lifecycle_response(id: Option<u64>, response: ResourceResponse<Value>) -> HostResponse {
    HostResponse {
        id,
        new_state: Some(response.state.unwrap_or(Value::Null)),
        private: Some(response.private),
        diagnostics: response.diagnostics,
        ..HostResponse::default()
    }
}

/// Dispatches one request to the provider.
///
/// The provider lock is only held to look the resource handler up, never
/// across an API call.
pub async fn handle_request(
    provider: &RwLock<BunnyCdnProvider>,
    envelope: Envelope,
    cancel: &CancellationToken,
) -> HostResponse {
    let id = envelope.id;
    debug!(id = ?id, method = envelope.request.method(), "Handling request");

    macro_rules! handler {
        ($type_name:expr) => {
            match provider.read().await.resource($type_name) {
                Ok(handler) => handler,
                Err(diagnostics) => return HostResponse::with_diagnostics(id, diagnostics),
            }
        };
    }

    match envelope.request {
        HostRequest::GetProviderSchema => HostResponse {
            schema: Some(provider.read().await.schema()),
            ..HostResponse::new(id)
        },
        HostRequest::ConfigureProvider { config } => {
            let diagnostics = provider.write().await.configure(&config);
            HostResponse::with_diagnostics(id, diagnostics)
        }
        HostRequest::ValidateResourceConfig { type_name, config } => {
            let diagnostics = provider.read().await.validate_resource(&type_name, &config);
            HostResponse::with_diagnostics(id, diagnostics)
        }
        HostRequest::PlanResourceChange {
            type_name,
            prior_state,
            config,
        } => {
            let mut plan = provider.read().await.plan_resource(
                &type_name,
                prior_state.as_ref(),
                config.as_ref(),
            );
            let diagnostics = std::mem::take(&mut plan.diagnostics);
            HostResponse {
                plan: Some(plan),
                ..HostResponse::with_diagnostics(id, diagnostics)
            }
        }
        HostRequest::CreateResource {
            type_name,
            planned_state,
        } => {
            let handler = handler!(&type_name);
            lifecycle_response(id, handler.create(planned_state, cancel).await)
        }
        HostRequest::ReadResource {
            type_name,
            current_state,
            private,
        } => {
            let handler = handler!(&type_name);
            lifecycle_response(id, handler.read(current_state, private, cancel).await)
        }
        HostRequest::UpdateResource {
            type_name,
            prior_state,
            planned_state,
            private,
        } => {
            let handler = handler!(&type_name);
            lifecycle_response(
                id,
                handler.update(prior_state, planned_state, private, cancel).await,
            )
        }
        HostRequest::DeleteResource {
            type_name,
            prior_state,
            private: _,
        } => {
            let handler = handler!(&type_name);
            lifecycle_response(id, handler.delete(prior_state, cancel).await)
        }
        HostRequest::ImportResourceState {
            type_name,
            import_id,
        } => {
            let handler = handler!(&type_name);
            lifecycle_response(id, handler.import(&import_id))
        }
        HostRequest::StopProvider => HostResponse::new(id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn read_error_still_flushes_earlier_responses() {
        let input: &[u8] = b"{\"id\": 1, \"method\": \"GetProviderSchema\"}\n\xff\xfe\n";
        let (writer, mut output) = tokio::io::duplex(1 << 20);
        let provider = BunnyCdnProvider::new("test", Settings::default());
        let shutdown = CancellationToken::new();

        let result = serve(provider, input, writer, shutdown.clone()).await;
        assert!(matches!(result, Err(ServerError::Io(_))));
        assert!(shutdown.is_cancelled());

        let mut written = String::new();
        output.read_to_string(&mut written).await.unwrap();
        let mut lines = written.lines();
        assert_eq!(lines.next(), Some(HANDSHAKE));
        let response: Value = serde_json::from_str(lines.next().unwrap()).unwrap();
        assert_eq!(response["id"], 1);
        assert_eq!(response["schema"]["version"], "test");
    }

    #[test]
    fn malformed_json_yields_error_without_id() {
        let response = parse_envelope("{not json").err().unwrap();
        assert_eq!(response.id, None);
        assert!(response.diagnostics.has_error());
    }

    #[test]
    fn unknown_method_keeps_the_id() {
        let response = parse_envelope(r#"{"id": 7, "method": "Teleport"}"#)
            .err()
            .unwrap();
        assert_eq!(response.id, Some(7));
        assert_eq!(
            response.diagnostics.errors().next().unwrap().summary,
            "Invalid Request"
        );
    }

    #[test]
    fn parses_read_request_with_private_state() {
        let envelope = parse_envelope(
            r#"{"id": 3, "method": "ReadResource", "type_name": "bunnycdn_hostname",
                "current_state": {"pullzone_id": 1}, "private": {"certificate": {}}}"#,
        )
        .unwrap();
        assert_eq!(envelope.id, Some(3));
        match envelope.request {
            HostRequest::ReadResource { type_name, private, .. } => {
                assert_eq!(type_name, "bunnycdn_hostname");
                assert!(!private.is_empty());
            }
            other => panic!("unexpected request {:?}", other),
        }
    }

    #[test]
    fn gone_resources_serialize_null_state() {
        let response = lifecycle_response(Some(1), ResourceResponse::default());
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("new_state").unwrap().is_null());
        assert!(json.get("schema").is_none());
    }
}
