//! Session gateway: the WebSocket surface of a matchmaking attempt
//!
//! Each participant opens one long-lived connection to `/gunfight/find`. The
//! gateway authenticates the request, upgrades it, runs the matchmaking
//! attempt, and delivers exactly one terminal text payload before closing.
//! A dedicated passive reader exists solely to notice the peer going away;
//! any read error or close frame cancels the in-flight attempt. The handler
//! task is the only writer on the socket, so the terminal payload can never
//! interleave with the close sequence.

use crate::error::Result;
use crate::service::app::AppState;
use crate::types::{MatchOutcome, SessionIdentity};
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

/// `GET /gunfight/find` - authenticate, upgrade, and run one attempt
pub async fn find_gunfight(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> Response {
    let identity = match state.authenticator().authenticate(&headers) {
        Ok(identity) => identity,
        Err(e) => {
            warn!("Rejecting gunfight search: {}", e);
            return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
    };

    ws.on_upgrade(move |socket| handle_session(state, socket, identity))
}

/// Handle the full lifecycle of one participant's session
async fn handle_session(state: Arc<AppState>, socket: WebSocket, identity: SessionIdentity) {
    info!(
        "Session opened - participant: '{}', score: {}",
        identity.participant_id, identity.score
    );

    let (mut sink, mut stream) = socket.split();
    let (cancel_tx, cancel_rx) = oneshot::channel();

    // Passive reader: never writes, only watches for the peer going away.
    // Inbound payloads carry no meaning during a search and are discarded.
    let participant_id = identity.participant_id.clone();
    let reader = tokio::spawn(async move {
        loop {
            match stream.next().await {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            }
        }
        debug!("Connection for '{}' closed by peer", participant_id);
        let _ = cancel_tx.send(());
    });

    let outcome = state
        .coordinator()
        .attempt_match(identity.participant_id.clone(), identity.score, cancel_rx)
        .await;

    // Exactly one terminal payload, then exactly one close. On the
    // cancelled path the peer is already gone; both sends fail harmlessly.
    if let Some(payload) = terminal_payload(&outcome) {
        if let Err(e) = sink.send(Message::Text(payload.into())).await {
            debug!(
                "Failed to deliver terminal payload to '{}': {}",
                identity.participant_id, e
            );
        }
    }
    let _ = sink.send(Message::Close(None)).await;
    reader.abort();

    info!(
        "Session closed - participant: '{}', outcome: {}",
        identity.participant_id,
        describe_outcome(&outcome)
    );
}

/// Map an attempt outcome to the single terminal payload, if any
fn terminal_payload(outcome: &Result<MatchOutcome>) -> Option<String> {
    match outcome {
        Ok(MatchOutcome::Paired { match_id, .. }) => Some(format!("Gunfight ID: {}", match_id)),
        Ok(MatchOutcome::TimedOut) => Some("No opponent found within the time limit".to_string()),
        // The connection is already gone; nobody is listening.
        Ok(MatchOutcome::Cancelled) => None,
        Err(e) => Some(e.to_string()),
    }
}

fn describe_outcome(outcome: &Result<MatchOutcome>) -> &'static str {
    match outcome {
        Ok(MatchOutcome::Paired { .. }) => "paired",
        Ok(MatchOutcome::TimedOut) => "timed out",
        Ok(MatchOutcome::Cancelled) => "cancelled",
        Err(_) => "failed",
    }
}
