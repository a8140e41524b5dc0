//! Bulk loading: group a stream of entries into bounded batches
//!
//! Producer -> `batch_entries` -> `write_batches` -> store, connected by
//! bounded tokio channels. Batch boundaries carry no meaning for readers.

use super::traits::{GraphStore, StorageError, StorageResult};
use crate::graph::Entry;
use std::io::BufRead;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

pub const DEFAULT_BATCH_SIZE: usize = 64;

/// Channel capacity between pipeline stages
const CHANNEL_CAPACITY: usize = 256;

/// Options for a bulk load
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Maximum entries per store write
    pub batch_size: usize,
    /// Also write the mirror of every edge entry
    pub emit_mirrors: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            emit_mirrors: false,
        }
    }
}

impl BatchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_mirrors(mut self, emit_mirrors: bool) -> Self {
        self.emit_mirrors = emit_mirrors;
        self
    }
}

/// Counts reported after a bulk load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteSummary {
    pub entries: usize,
    pub batches: usize,
}

/// Group `entries` into batches of at most `options.batch_size`
///
/// Must be called within a tokio runtime. The returned stream ends after
/// the input stream ends and the final partial batch is flushed.
pub fn batch_entries(
    mut entries: mpsc::Receiver<Entry>,
    options: &BatchOptions,
) -> mpsc::Receiver<Vec<Entry>> {
    let size = options.batch_size.max(1);
    let emit_mirrors = options.emit_mirrors;
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY / size + 1);

    tokio::spawn(async move {
        let mut batch = Vec::with_capacity(size);
        while let Some(entry) = entries.recv().await {
            let mirror = if emit_mirrors { entry.mirrored() } else { None };
            for entry in std::iter::once(entry).chain(mirror) {
                batch.push(entry);
                if batch.len() == size {
                    let full = std::mem::replace(&mut batch, Vec::with_capacity(size));
                    if tx.send(full).await.is_err() {
                        return;
                    }
                }
            }
        }
        if !batch.is_empty() {
            let _ = tx.send(batch).await;
        }
    });

    rx
}

/// Drain `batches` into `store`, one write per batch
pub async fn write_batches<S>(
    store: Arc<S>,
    mut batches: mpsc::Receiver<Vec<Entry>>,
) -> StorageResult<WriteSummary>
where
    S: GraphStore + ?Sized + 'static,
{
    let mut summary = WriteSummary::default();
    while let Some(batch) = batches.recv().await {
        let store = Arc::clone(&store);
        let len = batch.len();
        tokio::task::spawn_blocking(move || store.write(&batch))
            .await
            .map_err(|e| StorageError::Unavailable(format!("write task failed: {e}")))??;
        summary.entries += len;
        summary.batches += 1;
        debug!(batch = summary.batches, entries = len, "wrote batch");
    }
    Ok(summary)
}

/// Load an in-memory sequence of entries through the batching pipeline
pub async fn write_entries<S>(
    store: Arc<S>,
    entries: Vec<Entry>,
    options: &BatchOptions,
) -> StorageResult<WriteSummary>
where
    S: GraphStore + ?Sized + 'static,
{
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    tokio::spawn(async move {
        for entry in entries {
            if tx.send(entry).await.is_err() {
                break;
            }
        }
    });
    write_batches(store, batch_entries(rx, options)).await
}

/// Load JSON-lines entries (one serialized [`Entry`] per line)
///
/// Blank lines are skipped. A line that fails to parse aborts the load;
/// batches written before it stay written.
pub async fn load_json_lines<S, R>(
    store: Arc<S>,
    reader: R,
    options: &BatchOptions,
) -> StorageResult<WriteSummary>
where
    S: GraphStore + ?Sized + 'static,
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    let producer = tokio::task::spawn_blocking(move || -> StorageResult<usize> {
        let mut read = 0;
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let entry: Entry = serde_json::from_str(&line)?;
            if tx.blocking_send(entry).is_err() {
                break;
            }
            read += 1;
        }
        Ok(read)
    });

    let written = write_batches(store, batch_entries(rx, options)).await;
    let read = producer
        .await
        .map_err(|e| StorageError::Unavailable(format!("reader task failed: {e}")))??;
    let summary = written?;
    info!(read, written = summary.entries, batches = summary.batches, "load complete");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::schema::{mirror_edge, NODE_KIND_FACT, REF_EDGE};
    use crate::graph::{Direction, VName};
    use crate::storage::MemoryStore;
    use std::io::Cursor;

    fn facts(n: usize) -> Vec<Entry> {
        (0..n)
            .map(|i| Entry::fact(VName::from_signature(format!("n{i}")), NODE_KIND_FACT, "test"))
            .collect()
    }

    #[tokio::test]
    async fn batches_are_bounded() {
        let (tx, rx) = mpsc::channel(8);
        let mut batches = batch_entries(rx, &BatchOptions::new().with_batch_size(64));
        tokio::spawn(async move {
            for entry in facts(150) {
                tx.send(entry).await.unwrap();
            }
        });

        let mut sizes = Vec::new();
        while let Some(batch) = batches.recv().await {
            sizes.push(batch.len());
        }
        assert_eq!(sizes, vec![64, 64, 22]);
    }

    #[tokio::test]
    async fn empty_stream_yields_no_batches() {
        let (tx, rx) = mpsc::channel::<Entry>(1);
        drop(tx);
        let mut batches = batch_entries(rx, &BatchOptions::default());
        assert!(batches.recv().await.is_none());
    }

    #[tokio::test]
    async fn writes_every_entry() {
        let store = Arc::new(MemoryStore::new());
        let summary = write_entries(Arc::clone(&store), facts(130), &BatchOptions::default())
            .await
            .unwrap();

        assert_eq!(summary, WriteSummary { entries: 130, batches: 3 });
        assert_eq!(store.entry_count(), 130);
    }

    #[tokio::test]
    async fn mirrors_are_emitted_on_request() {
        let store = Arc::new(MemoryStore::new());
        let a = VName::from_signature("a");
        let b = VName::from_signature("b");
        let entries = vec![Entry::edge(a.clone(), REF_EDGE, b.clone())];

        let summary = write_entries(
            Arc::clone(&store),
            entries,
            &BatchOptions::new().with_batch_size(1).with_mirrors(true),
        )
        .await
        .unwrap();

        assert_eq!(summary.entries, 2);
        assert_eq!(summary.batches, 2);
        let incoming = store.read_edges(&b, Direction::Incoming).unwrap();
        assert_eq!(incoming[0].kind, mirror_edge(REF_EDGE));
        assert_eq!(incoming[0].target, a);
    }

    #[tokio::test]
    async fn loads_json_lines() {
        let lines = facts(3)
            .iter()
            .map(|e| serde_json::to_string(e).unwrap())
            .collect::<Vec<_>>()
            .join("\n\n");
        let store = Arc::new(MemoryStore::new());

        let summary =
            load_json_lines(Arc::clone(&store), Cursor::new(lines), &BatchOptions::default())
                .await
                .unwrap();

        assert_eq!(summary.entries, 3);
        assert_eq!(store.entry_count(), 3);
    }

    #[tokio::test]
    async fn malformed_line_fails_the_load() {
        let store = Arc::new(MemoryStore::new());
        let result = load_json_lines(
            Arc::clone(&store),
            Cursor::new("{ not json }\n"),
            &BatchOptions::default(),
        )
        .await;

        assert!(matches!(result, Err(StorageError::Serialization(_))));
    }

    #[tokio::test]
    async fn edge_without_target_fails_the_load() {
        let store = Arc::new(MemoryStore::new());
        let lines = concat!(
            r#"{"source":{"signature":"a"},"fact_name":"/kythe/node/kind","fact_value":[]}"#,
            "\n",
            r#"{"source":{"signature":"a"},"edge_kind":"/kythe/edge/ref","fact_name":"/"}"#,
            "\n",
        );
        let result =
            load_json_lines(Arc::clone(&store), Cursor::new(lines), &BatchOptions::default())
                .await;

        assert!(matches!(result, Err(StorageError::CorruptEntry(_))));
        assert!(store
            .read_facts(&VName::from_signature("a"))
            .unwrap()
            .is_empty());
    }
}
