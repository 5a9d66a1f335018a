use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::AuditLog,
    store::{DocumentStore, collections, to_document},
};

pub async fn log_audit(
    store: &dyn DocumentStore,
    user_id: Option<&str>,
    action: &str,
    resource: Option<&str>,
    metadata: Option<Value>,
) -> AppResult<()> {
    let entry = AuditLog {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.map(str::to_string),
        action: action.to_string(),
        resource: resource.map(str::to_string),
        metadata,
        created_at: Utc::now(),
    };
    store
        .insert_one(collections::AUDIT_LOGS, to_document(&entry)?)
        .await?;
    Ok(())
}

/// Like [`log_audit`], but a failed write only produces a warning.
pub async fn record(
    store: &dyn DocumentStore,
    user_id: Option<&str>,
    action: &str,
    resource: Option<&str>,
    metadata: Option<Value>,
) {
    if let Err(err) = log_audit(store, user_id, action, resource, metadata).await {
        tracing::warn!(error = %err, action, "audit log failed");
    }
}
