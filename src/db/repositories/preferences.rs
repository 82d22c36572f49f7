use std::collections::HashMap;

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection};

use crate::db::Database;

/// Writes every `(key, value)` pair of one namespace in a single transaction.
pub(crate) fn upsert_values(
    conn: &mut Connection,
    namespace: &str,
    values: &[(&str, f64)],
) -> Result<()> {
    let updated_at = Utc::now().to_rfc3339();
    let tx = conn
        .transaction()
        .context("failed to open preferences transaction")?;
    for (key, value) in values {
        tx.execute(
            "INSERT INTO preferences (namespace, key, value, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(namespace, key) DO UPDATE SET
                 value = excluded.value,
                 updated_at = excluded.updated_at",
            params![namespace, key, value, updated_at],
        )
        .with_context(|| format!("failed to write preference {namespace}.{key}"))?;
    }
    tx.commit().context("failed to commit preferences")?;
    Ok(())
}

pub(crate) fn read_namespace(conn: &Connection, namespace: &str) -> Result<HashMap<String, f64>> {
    let mut stmt = conn.prepare(
        "SELECT key, value
         FROM preferences
         WHERE namespace = ?1",
    )?;

    let values = stmt
        .query_map(params![namespace], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
        })?
        .collect::<Result<HashMap<_, _>, _>>()
        .with_context(|| format!("failed to read preferences for {namespace}"))?;

    Ok(values)
}

impl Database {
    /// All values stored under `namespace`.
    pub async fn get_preferences(&self, namespace: &str) -> Result<HashMap<String, f64>> {
        let namespace = namespace.to_string();
        self.execute(move |conn| read_namespace(conn, &namespace))
            .await
    }

    pub async fn clear_preferences(&self, namespace: &str) -> Result<()> {
        let namespace = namespace.to_string();
        self.execute(move |conn| {
            conn.execute(
                "DELETE FROM preferences WHERE namespace = ?1",
                params![namespace],
            )
            .with_context(|| "failed to clear preferences")?;
            Ok(())
        })
        .await
    }
}
