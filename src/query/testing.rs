//! In-memory [`Store`] that records every statement it receives.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::store::Store;
use super::value::Statement;
use crate::error::AppResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Count,
    Rows,
    Execute,
}

/// Answers counts with `total`, row queries with `rows`, and executes with 1.
#[derive(Default)]
pub struct RecordingStore {
    pub total: i64,
    pub rows: Vec<Value>,
    calls: Mutex<Vec<(Call, Statement)>>,
}

impl RecordingStore {
    pub fn with_rows(rows: Vec<Value>) -> Self {
        Self {
            total: rows.len() as i64,
            rows,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<(Call, Statement)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn kinds(&self) -> Vec<Call> {
        self.calls().into_iter().map(|(c, _)| c).collect()
    }

    fn record(&self, call: Call, stmt: Statement) {
        self.calls.lock().unwrap().push((call, stmt));
    }
}

#[async_trait]
impl Store for RecordingStore {
    async fn query_count(&self, stmt: Statement) -> AppResult<i64> {
        self.record(Call::Count, stmt);
        Ok(self.total)
    }

    async fn query_rows(&self, stmt: Statement) -> AppResult<Vec<Value>> {
        self.record(Call::Rows, stmt);
        Ok(self.rows.clone())
    }

    async fn execute(&self, stmt: Statement) -> AppResult<usize> {
        self.record(Call::Execute, stmt);
        Ok(1)
    }
}
