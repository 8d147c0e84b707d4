//! WebSocket server
//!
//! Accepts connections at `/ws`. A connection must send `authenticate`
//! before it receives notifications; `/health` answers with the number of
//! live sessions.

use super::messages::{ClientMessage, ServerMessage, SessionUser};
use super::registry::SessionRegistry;
use axum::{
    Json, Router,
    extract::State,
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    response::IntoResponse,
    routing::get,
};
use combis_application::ports::notification_store::NotificationStore;
use combis_application::ports::push_channel::{PushChannel, SessionId};
use combis_application::ports::session_authenticator::AuthError;
use combis_application::use_cases::notification_error::NotificationError;
use combis_application::use_cases::push_notifications::PushNotificationsUseCase;
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Listening address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RealtimeSettings {
    pub bind: String,
    pub port: u16,
}

impl Default for RealtimeSettings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 5001,
        }
    }
}

struct AppState<S: NotificationStore + 'static> {
    notifications: Arc<PushNotificationsUseCase<S>>,
    registry: Arc<SessionRegistry>,
}

impl<S: NotificationStore + 'static> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            notifications: Arc::clone(&self.notifications),
            registry: Arc::clone(&self.registry),
        }
    }
}

pub struct RealtimeServer<S: NotificationStore + 'static> {
    settings: RealtimeSettings,
    state: AppState<S>,
}

impl<S: NotificationStore + 'static> RealtimeServer<S> {
    /// `notifications` must push through the same `registry`
    pub fn new(
        settings: RealtimeSettings,
        notifications: Arc<PushNotificationsUseCase<S>>,
        registry: Arc<SessionRegistry>,
    ) -> Self {
        Self {
            settings,
            state: AppState {
                notifications,
                registry,
            },
        }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/ws", get(ws_handler::<S>))
            .route("/health", get(health::<S>))
            .with_state(self.state.clone())
    }

    /// Serve until `cancel` fires
    pub async fn serve(self, cancel: CancellationToken) -> std::io::Result<()> {
        let addr = format!("{}:{}", self.settings.bind, self.settings.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        info!("Real-time server listening on {}", addr);
        axum::serve(listener, self.router())
            .with_graceful_shutdown(cancel.cancelled_owned())
            .await
    }
}

async fn health<S: NotificationStore + 'static>(
    State(state): State<AppState<S>>,
) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "sessions": state.registry.session_count(),
        "members": state.registry.connected_members().len(),
    }))
}

async fn ws_handler<S: NotificationStore + 'static>(
    ws: WebSocketUpgrade,
    State(state): State<AppState<S>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket<S: NotificationStore + 'static>(socket: WebSocket, state: AppState<S>) {
    let (session, mut outbox) = state.registry.attach();
    let (mut sink, mut stream) = socket.split();

    let writer = tokio::spawn(async move {
        while let Some(message) = outbox.recv().await {
            if sink.send(Message::Text(message.to_json())).await.is_err() {
                break;
            }
        }
    });

    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                if let Some(reply) = handle_client_message(&state, session, &text).await {
                    state.registry.send_to_session(session, reply);
                }
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                warn!("Session {} receive error: {}", session, e);
                break;
            }
        }
    }

    state.notifications.disconnect(session);
    writer.abort();
}

/// Handle one client frame; returns the direct reply, if any
async fn handle_client_message<S: NotificationStore + 'static>(
    state: &AppState<S>,
    session: SessionId,
    text: &str,
) -> Option<ServerMessage> {
    let message = match serde_json::from_str::<ClientMessage>(text) {
        Ok(message) => message,
        Err(e) => {
            debug!("Session {} sent an invalid frame: {}", session, e);
            return Some(ServerMessage::error("Message invalide"));
        }
    };

    match message {
        ClientMessage::Authenticate { token } => {
            match state.notifications.authenticate(session, &token).await {
                Ok(auth) => Some(ServerMessage::Authenticated {
                    success: true,
                    user: SessionUser {
                        id: auth.identity.membre_id,
                        nom: auth.identity.nom_complet,
                    },
                }),
                Err(e) => {
                    warn!("Session {} failed to authenticate: {}", session, e);
                    Some(ServerMessage::AuthenticationError {
                        message: authentication_message(&e).to_string(),
                    })
                }
            }
        }
        ClientMessage::MarkNotificationRead { notification_id } => {
            let membre_id = state.registry.member_of(session)?;
            match state.notifications.mark_read(notification_id, membre_id).await {
                Ok(_) => None,
                Err(e) => {
                    warn!("Could not mark notification {} read: {}", notification_id, e);
                    Some(ServerMessage::error("Erreur serveur"))
                }
            }
        }
        ClientMessage::GetUnreadCount => {
            let membre_id = state.registry.member_of(session)?;
            match state.notifications.unread_count(membre_id).await {
                Ok(count) => Some(ServerMessage::UnreadCount { count }),
                Err(e) => {
                    warn!("Could not count unread notifications: {}", e);
                    Some(ServerMessage::error("Erreur serveur"))
                }
            }
        }
        ClientMessage::Ping => Some(ServerMessage::Pong),
    }
}

fn authentication_message(error: &NotificationError) -> &'static str {
    match error {
        NotificationError::Unauthorized(AuthError::UnknownMember) => "Utilisateur non trouvé",
        _ => "Token invalide",
    }
}
