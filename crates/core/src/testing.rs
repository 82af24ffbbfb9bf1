//! Test doubles shared by the unit tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use tokio::sync::Notify;

use crate::backend::Backend;
use crate::error::{Error, Result};

/// In-memory backend answering GETs from a path -> body map
#[derive(Default)]
pub struct FakeBackend {
    pub bodies: Mutex<HashMap<String, Value>>,
    pub calls: Mutex<Vec<String>>,
    pub fail: AtomicBool,
    pub hang: AtomicBool,
    pub gate: Option<Arc<Notify>>,
}

impl FakeBackend {
    pub fn with(path: &str, body: Value) -> Self {
        let backend = Self::default();
        backend.set(path, body);
        backend
    }

    pub fn failing() -> Self {
        let backend = Self::default();
        backend.fail.store(true, Ordering::SeqCst);
        backend
    }

    pub fn set(&self, path: &str, body: Value) {
        self.bodies.lock().unwrap().insert(path.to_string(), body);
    }

    pub fn calls_to(&self, path: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|p| *p == path)
            .count()
    }
}

impl Backend for FakeBackend {
    async fn get_json(&self, path: &str) -> Result<Value> {
        self.calls.lock().unwrap().push(path.to_string());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.hang.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::Backend("connection refused".into()));
        }
        let body = self.bodies.lock().unwrap().get(path).cloned();
        Ok(body.unwrap_or_else(|| json!({ "data": [] })))
    }
}
