//! WebSocket upgrade handler.
//!
//! Responsibilities:
//! - Run the admission pipeline *before* upgrading
//! - Reject with the decision's HTTP status and a small JSON body
//! - After admission: ping/pong, idle timeout, echo text frames

use axum::{
    extract::{ws::Message, ws::WebSocket, ws::WebSocketUpgrade, State},
    http::{HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio::time::{Duration, Instant};

use wsverify_core::error::{Result, VerifyError};
use wsverify_core::AdmissionDecision;

use crate::app_state::AppState;
use crate::transport::upgrade::{admit, describe};

// --------------------
// Entry
// --------------------
pub async fn ws_upgrade(
    State(app): State<AppState>,
    uri: Uri,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> Response {
    let request = describe(&uri, &headers, app.cfg().gateway.trust_forwarded_proto);
    let origin = request.origin.clone();
    let verifier = app.verifier();

    match admit(verifier.as_ref(), request, app.check_timeout()).await {
        AdmissionDecision::Admit => {
            tracing::debug!(%origin, "upgrade admitted");
            ws.on_upgrade(move |socket| async move {
                if let Err(e) = run_session(app, socket).await {
                    tracing::debug!(error = %e, "session ended with error");
                }
            })
        }
        AdmissionDecision::Reject { status, message } => {
            tracing::info!(%origin, status, msg = ?message, "upgrade rejected");
            reject_response(status, message)
        }
    }
}

fn reject_response(status: u16, message: Option<String>) -> Response {
    let code = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_REQUEST);
    (code, Json(json!({ "status": code.as_u16(), "msg": message }))).into_response()
}

// --------------------
// Session loop
// --------------------
async fn run_session(app: AppState, socket: WebSocket) -> Result<()> {
    let gw = &app.cfg().gateway;
    let ping_every = Duration::from_millis(gw.ping_interval_ms);
    let idle_timeout = Duration::from_millis(gw.idle_timeout_ms);

    let (mut ws_tx, mut ws_rx) = socket.split();

    let mut ping_tick = tokio::time::interval(ping_every);
    ping_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    let mut last_activity = Instant::now();

    loop {
        let outbound = tokio::select! {
            incoming = ws_rx.next() => {
                let Some(incoming) = incoming else { break; };
                let msg = incoming
                    .map_err(|e| VerifyError::Internal(format!("ws read failed: {e}")))?;
                last_activity = Instant::now();

                match msg {
                    Message::Text(s) => Some(Message::Text(s)),
                    Message::Binary(b) => Some(Message::Binary(b)),
                    Message::Ping(p) => Some(Message::Pong(p)),
                    Message::Pong(_) => None,
                    Message::Close(_) => break,
                }
            }

            _ = ping_tick.tick() => Some(Message::Ping(Vec::new())),

            _ = tokio::time::sleep(Duration::from_millis(250)) => {
                if last_activity.elapsed() >= idle_timeout {
                    tracing::debug!("idle timeout");
                    break;
                }
                None
            }
        };

        if let Some(m) = outbound {
            ws_tx
                .send(m)
                .await
                .map_err(|e| VerifyError::Internal(format!("ws write failed: {e}")))?;
        }
    }

    Ok(())
}
