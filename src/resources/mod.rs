//! One `impl CallWhiz` block per resource group.

mod agents;
mod api_keys;
mod calls;
mod conversations;
mod usage;
mod webhooks;

use serde::Serialize;
use serde_json::Value;

use crate::error::{CallWhizError, Result};
use crate::schema::{self, SchemaKind};

/// Serializes `params`, dropping unset fields, and runs it through the schema.
pub(crate) fn validated<T: Serialize>(kind: SchemaKind, params: &T) -> Result<Value> {
    let payload = serde_json::to_value(params)
        .map_err(|e| CallWhizError::validation(format!("Invalid request data: {e}")))?;
    schema::validate(kind, &payload)
}
