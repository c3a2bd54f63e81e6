use api_types::notification::NotificationList;
use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::Utc;
use engine::Notification;
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<NotificationList>,
) -> Result<Json<Vec<Notification>>, ServerError> {
    let unread_only = query.unread_only.unwrap_or(false);
    Ok(Json(state.engine.notifications(unread_only).await?))
}

pub async fn mark_read(
    State(state): State<ServerState>,
    Path(notification_id): Path<Uuid>,
) -> Result<Json<Notification>, ServerError> {
    Ok(Json(
        state
            .engine
            .mark_notification_read(notification_id, Utc::now())
            .await?,
    ))
}
