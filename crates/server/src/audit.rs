use api_types::audit::AuditQuery;
use axum::{
    Json,
    extract::{Query, State},
};
use engine::{AuditEntry, AuditFilter};

use crate::{ServerError, server::ServerState};

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<AuditQuery>,
) -> Result<Json<Vec<AuditEntry>>, ServerError> {
    let filter = AuditFilter {
        entity_type: query.entity_type,
        entity_id: query.entity_id,
        limit: query.limit,
    };
    Ok(Json(state.engine.audit_log(filter).await?))
}
