//! SQLite storage backend

use super::traits::{edge_parts, Facts, GraphStore, OpenStore, StorageError, StorageResult};
use crate::graph::{ticket, Direction, Entry, StoredEdge, VName};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// SQLite-backed graph store
///
/// All entries live in one `entries` table keyed by
/// `(source, edge_kind, target, fact_name)`, with VNames stored as tickets
/// and an empty `edge_kind`/`target` marking a fact. Edge kinds are never
/// empty, so the two cannot collide.
/// Thread-safe via internal mutex on the connection.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    fn init_schema(conn: &Connection) -> StorageResult<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS entries (
                source TEXT NOT NULL,
                edge_kind TEXT NOT NULL DEFAULT '',
                target TEXT NOT NULL DEFAULT '',
                fact_name TEXT NOT NULL,
                fact_value BLOB NOT NULL,
                PRIMARY KEY (source, edge_kind, target, fact_name)
            );

            -- Concurrent reads while a bulk load is writing
            PRAGMA journal_mode = WAL;
            "#,
        )?;
        Ok(())
    }

    fn conn(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StorageError::Unavailable("connection mutex poisoned".into()))
    }

    fn decode_target(target: &str) -> StorageResult<VName> {
        ticket::decode(target)
            .map_err(|e| StorageError::CorruptEntry(format!("target {target:?}: {e}")))
    }
}

impl OpenStore for SqliteStore {
    fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl GraphStore for SqliteStore {
    fn read_facts(&self, vname: &VName) -> StorageResult<Facts> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(
            "SELECT fact_name, fact_value FROM entries WHERE source = ?1 AND edge_kind = ''",
        )?;
        let rows = stmt.query_map(params![vname.to_ticket()], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, Vec<u8>>(1)?))
        })?;

        let mut facts = Facts::new();
        for row in rows {
            let (name, value) = row?;
            facts.insert(name, value);
        }
        Ok(facts)
    }

    fn read_edges(&self, vname: &VName, direction: Direction) -> StorageResult<Vec<StoredEdge>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(
            "SELECT edge_kind, target, fact_name, fact_value FROM entries
             WHERE source = ?1 AND edge_kind != '' ORDER BY rowid",
        )?;
        let rows = stmt.query_map(params![vname.to_ticket()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Vec<u8>>(3)?,
            ))
        })?;

        let mut edges = Vec::new();
        for row in rows {
            let (kind, target, name, value) = row?;
            if !direction.admits(&kind) {
                continue;
            }
            edges.push(StoredEdge {
                kind,
                target: Self::decode_target(&target)?,
                annotation: (name, value),
            });
        }
        Ok(edges)
    }

    fn write(&self, batch: &[Entry]) -> StorageResult<()> {
        let parts = batch.iter().map(edge_parts).collect::<StorageResult<Vec<_>>>()?;
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                r#"
                INSERT INTO entries (source, edge_kind, target, fact_name, fact_value)
                VALUES (?1, ?2, ?3, ?4, ?5)
                ON CONFLICT(source, edge_kind, target, fact_name) DO UPDATE SET
                    fact_value = excluded.fact_value
                "#,
            )?;
            for (entry, edge) in batch.iter().zip(parts) {
                let (kind, target) = match edge {
                    Some((kind, target)) => (kind.to_string(), target.to_ticket()),
                    None => (String::new(), String::new()),
                };
                stmt.execute(params![
                    entry.source.to_ticket(),
                    kind,
                    target,
                    entry.fact_name,
                    entry.fact_value,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::schema::{mirror_edge, NODE_KIND_FACT, REF_EDGE};
    use serde_json::json;

    #[test]
    fn facts_and_edges_are_stored_apart() {
        let store = SqliteStore::open_in_memory().unwrap();
        let anchor = VName::from_signature("anchor").with_corpus("c");
        let target = VName::from_signature("target").with_path("a/b.rs");

        store
            .write(&[
                Entry::fact(anchor.clone(), NODE_KIND_FACT, "anchor"),
                Entry::edge(anchor.clone(), REF_EDGE, target.clone()),
            ])
            .unwrap();

        let facts = store.read_facts(&anchor).unwrap();
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[NODE_KIND_FACT], b"anchor");

        let edges = store.read_edges(&anchor, Direction::Outgoing).unwrap();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].kind, REF_EDGE);
        assert_eq!(edges[0].target, target);
    }

    #[test]
    fn rewrite_replaces_value() {
        let store = SqliteStore::open_in_memory().unwrap();
        let node = VName::from_signature("n");
        store.write(&[Entry::fact(node.clone(), NODE_KIND_FACT, "old")]).unwrap();
        store.write(&[Entry::fact(node.clone(), NODE_KIND_FACT, "new")]).unwrap();

        let facts = store.read_facts(&node).unwrap();
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[NODE_KIND_FACT], b"new");
    }

    #[test]
    fn incoming_reads_mirror_kinds() {
        let store = SqliteStore::open_in_memory().unwrap();
        let a = VName::from_signature("a");
        let b = VName::from_signature("b");
        let edge = Entry::edge(a.clone(), REF_EDGE, b.clone());
        store.write(&[edge.clone(), edge.mirrored().unwrap()]).unwrap();

        let incoming = store.read_edges(&b, Direction::Incoming).unwrap();
        assert_eq!(incoming.len(), 1);
        assert_eq!(incoming[0].kind, mirror_edge(REF_EDGE));
        assert_eq!(incoming[0].target, a);
        assert!(store.read_edges(&b, Direction::Outgoing).unwrap().is_empty());
    }

    #[test]
    fn persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("xrefs.db");
        let node = VName::from_signature("n");
        {
            let store = SqliteStore::open(&path).unwrap();
            store.write(&[Entry::fact(node.clone(), NODE_KIND_FACT, "record")]).unwrap();
        }
        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.read_facts(&node).unwrap()[NODE_KIND_FACT], b"record");
    }

    #[test]
    fn malformed_edges_are_not_stored() {
        let store = SqliteStore::open_in_memory().unwrap();
        let a = VName::from_signature("a");
        let fact = Entry::fact(a.clone(), NODE_KIND_FACT, "record");
        let half_edge: Entry = serde_json::from_value(json!({
            "source": { "signature": "a" },
            "edge_kind": REF_EDGE,
            "fact_name": "/"
        }))
        .unwrap();
        let mut unkinded = Entry::edge(a.clone(), REF_EDGE, VName::from_signature("b"));
        unkinded.edge_kind = Some(String::new());

        for bad in [half_edge, unkinded] {
            let err = store.write(&[fact.clone(), bad]).unwrap_err();
            assert!(matches!(err, StorageError::CorruptEntry(_)));
        }
        assert!(store.read_facts(&a).unwrap().is_empty());
        assert!(store.read_edges(&a, Direction::Both).unwrap().is_empty());
    }
}
