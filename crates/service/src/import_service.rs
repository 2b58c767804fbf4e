use chrono::Utc;
use sea_orm::{DatabaseConnection, EntityTrait, TransactionTrait};
use serde_json::Value;
use tracing::{debug, warn};

use models::product::{self, Entity as ProductEntity};

use crate::domain::CreateProductInput;
use crate::errors::ServiceError;

/// Outcome of a bulk import: rows persisted and elements skipped by validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOutcome {
    pub added: usize,
    pub skipped: usize,
}

/// Extract the record array from an uploaded JSON document.
/// Accepted shapes: a top-level array, or an object carrying a
/// `filtered_products` array. Anything else is a format error.
pub fn parse_payload(bytes: &[u8]) -> Result<Vec<Value>, ServiceError> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| ServiceError::Format(format!("invalid JSON: {}", e)))?;
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => match map.remove("filtered_products") {
            Some(Value::Array(items)) => Ok(items),
            _ => Err(ServiceError::Format(
                "expected an array or an object with a `filtered_products` array".into(),
            )),
        },
        _ => Err(ServiceError::Format(
            "expected an array or an object with a `filtered_products` array".into(),
        )),
    }
}

/// Ingest a JSON upload: validate each element independently, skip the bad
/// ones, then persist every surviving row in a single transaction. The commit
/// is all-or-nothing over the validated subset.
pub async fn import_products(
    db: &DatabaseConnection,
    bytes: &[u8],
) -> Result<ImportOutcome, ServiceError> {
    let items = parse_payload(bytes)?;

    let now = Utc::now().into();
    let mut rows = Vec::with_capacity(items.len());
    let mut skipped = 0usize;
    for (index, item) in items.into_iter().enumerate() {
        let parsed = serde_json::from_value::<CreateProductInput>(item)
            .map_err(|e| ServiceError::Validation(e.to_string()))
            .and_then(|input| input.into_new_product())
            .and_then(|new| {
                product::validate(&new)?;
                Ok(new)
            });
        match parsed {
            Ok(new) => {
                debug!(index, title = %new.title, "staging import record");
                rows.push(product::active_model(new, now));
            }
            Err(e) => {
                warn!(index, error = %e, "skipping invalid import record");
                skipped += 1;
            }
        }
    }

    let added = rows.len();
    if added > 0 {
        let txn = db.begin().await.map_err(|e| ServiceError::Db(e.to_string()))?;
        ProductEntity::insert_many(rows)
            .exec(&txn)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        txn.commit().await.map_err(|e| ServiceError::Db(e.to_string()))?;
    }

    Ok(ImportOutcome { added, skipped })
}
