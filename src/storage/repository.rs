//! Owner-scoped record access over a key-value store.
//!
//! Every write is read-modify-write of the whole key: load the full
//! sequence, change it in memory, write the full sequence back.
//!
//! The sequence is handled as raw JSON values so that a record which no
//! longer parses is skipped on read but written back untouched. A value
//! that isn't an array at all reads as empty.

use serde_json::Value;
use uuid::Uuid;

use crate::model::Record;

use super::{KeyValueStore, Result};

/// Record access scoped to one owning volunteer.
pub trait Repository {
    /// Loads every record of kind `R` owned by `owner`, in stored order.
    ///
    /// Records that fail to parse are skipped with a warning.
    fn list_by_owner<R: Record>(&self, owner: &str) -> Result<Vec<R>>;

    /// Replaces the stored record with the same id, or appends it.
    fn upsert<R: Record>(&self, record: &R) -> Result<()>;

    /// Removes the record of kind `R` with the given id, if present.
    fn remove<R: Record>(&self, id: Uuid) -> Result<()>;

    /// Replaces every record of kind `R` owned by `owner` with `records`.
    ///
    /// Other owners' records keep their content and relative order.
    fn replace_all<R: Record>(&self, owner: &str, records: Vec<R>) -> Result<()>;
}

impl<S: KeyValueStore> Repository for S {
    fn list_by_owner<R: Record>(&self, owner: &str) -> Result<Vec<R>> {
        let records = load::<R>(self)?
            .into_iter()
            .filter(|v| owned_by::<R>(v, owner))
            .filter_map(decode::<R>)
            .collect();
        Ok(records)
    }

    fn upsert<R: Record>(&self, record: &R) -> Result<()> {
        let mut values = load::<R>(self)?;
        let value = serde_json::to_value(record)?;
        match values.iter().position(|v| has_id(v, record.id())) {
            Some(i) => values[i] = value,
            None => values.push(value),
        }
        save::<R>(self, &values)
    }

    fn remove<R: Record>(&self, id: Uuid) -> Result<()> {
        let mut values = load::<R>(self)?;
        let before = values.len();
        values.retain(|v| !has_id(v, id));
        if values.len() == before {
            return Ok(());
        }
        save::<R>(self, &values)
    }

    fn replace_all<R: Record>(&self, owner: &str, records: Vec<R>) -> Result<()> {
        let mut values = load::<R>(self)?;
        values.retain(|v| !owned_by::<R>(v, owner));
        for record in &records {
            values.push(serde_json::to_value(record)?);
        }
        save::<R>(self, &values)
    }
}

/// Reads the full sequence under `R::KEY`, degrading to empty when it isn't a JSON array.
fn load<R: Record>(store: &impl KeyValueStore) -> Result<Vec<Value>> {
    let Some(text) = store.get(R::KEY)? else {
        return Ok(Vec::new());
    };
    match serde_json::from_str(&text) {
        Ok(values) => Ok(values),
        Err(e) => {
            tracing::warn!(key = R::KEY, error = %e, "stored records are malformed; reading as empty");
            Ok(Vec::new())
        }
    }
}

fn save<R: Record>(store: &impl KeyValueStore, values: &[Value]) -> Result<()> {
    let json = serde_json::to_string(values)?;
    store.set(R::KEY, &json)?;
    tracing::debug!(key = R::KEY, count = values.len(), "wrote records");
    Ok(())
}

fn decode<R: Record>(value: Value) -> Option<R> {
    match serde_json::from_value(value) {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::warn!(key = R::KEY, error = %e, "skipping unreadable record");
            None
        }
    }
}

fn owned_by<R: Record>(value: &Value, owner: &str) -> bool {
    value.get(R::OWNER_FIELD).and_then(Value::as_str) == Some(owner)
}

fn has_id(value: &Value, id: Uuid) -> bool {
    value
        .get("id")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<Uuid>().ok())
        == Some(id)
}
