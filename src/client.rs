//! Domain-specific convenience client over the worker pool.

use crate::config::ConnectionConfig;
use crate::error::Result;
use crate::pool::WorkerPool;
use crate::request::RequestDescriptor;
use serde_json::json;

/// High-level client for the text algorithm endpoints.
///
/// Sugar over [`WorkerPool`]: builds descriptors, fans batches out, and
/// decodes response bodies into typed values. The pool stays reachable
/// through [`pool`](Self::pool) for callers that want explicit descriptors.
pub struct TextClient {
    pool: WorkerPool,
}

impl TextClient {
    pub fn new(n_workers: usize, config: ConnectionConfig) -> Result<Self> {
        Ok(Self {
            pool: WorkerPool::new(n_workers, config)?,
        })
    }

    /// Finds anagram groups for each input string via `POST /text/anagrams`.
    ///
    /// One request per input goes out over the pool concurrently; decoded
    /// results come back index-aligned with `inputs`, whatever order the
    /// round trips completed in.
    pub async fn anagrams(&self, inputs: &[String]) -> Result<Vec<Vec<Vec<String>>>> {
        let descriptors = inputs
            .iter()
            .map(|input| RequestDescriptor::post("/text/anagrams", json!({ "input": input })))
            .collect::<Result<Vec<_>>>()?;

        // handles come back in submission order, which is input order
        let futures = self.pool.batch_submit(descriptors)?;

        let mut results = Vec::with_capacity(futures.len());
        for mut future in futures {
            let record = future.wait().await?;
            results.push(record.decode()?);
        }
        Ok(results)
    }

    /// Probes the backend's liveness endpoint (`GET /`).
    pub async fn ping(&self) -> Result<bool> {
        let mut future = self.pool.submit(RequestDescriptor::get("/")?)?;
        let record = future.wait().await?;
        Ok(record.is_success())
    }

    /// The underlying pool, for explicit descriptors and worker snapshots.
    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    /// Shuts the underlying pool down. Call once before dropping the client;
    /// see [`WorkerPool::shutdown`] for the `wait` semantics.
    pub async fn shutdown(&self, wait: bool) {
        self.pool.shutdown(wait).await;
    }
}
