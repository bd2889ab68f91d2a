#![allow(dead_code)]
//! Stand-ins for the classifier capability and the verification transport

use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use plantguard_id::models::PixelImage;
use plantguard_id::services::{
    Classifier, ClassifierResponse, Inventory, TaxonomyRanker, TransportError, VerifierTransport,
};

/// Message carried by [`StubClassifier::panicking`]
pub const PANIC_DETAIL: &str = "scorer weights at /srv/models/secret.bin are corrupt";

/// Classifier that ranks a fixed probability vector, or always fails
pub struct StubClassifier {
    inventory: Inventory,
    probabilities: Vec<f64>,
    failure: Option<(i32, String)>,
    panics: bool,
    calls: AtomicUsize,
}

impl StubClassifier {
    pub fn ranked(inventory: Inventory, probabilities: Vec<f64>) -> Self {
        Self {
            inventory,
            probabilities,
            failure: None,
            panics: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(inventory: Inventory, status: i32, message: &str) -> Self {
        Self {
            inventory,
            probabilities: Vec::new(),
            failure: Some((status, message.to_string())),
            panics: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// Panics inside `identify`, with a message that must never reach clients
    pub fn panicking(inventory: Inventory) -> Self {
        Self {
            inventory,
            probabilities: Vec::new(),
            failure: None,
            panics: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Classifier for StubClassifier {
    fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    fn is_ready(&self) -> bool {
        self.failure.is_none()
    }

    fn identify(&self, _image: &PixelImage, top_k: usize) -> ClassifierResponse {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.panics {
            panic!("{}", PANIC_DETAIL);
        }
        match &self.failure {
            Some((status, message)) => ClassifierResponse::failure(*status, message.clone()),
            None => ClassifierResponse::success(TaxonomyRanker::rank(
                &self.inventory,
                &self.probabilities,
                top_k,
            )),
        }
    }
}

/// What the fake transport answers with
#[derive(Clone)]
pub enum FakeReply {
    Envelope(Value),
    Timeout,
    Status(u16),
    /// Never answers within any sane test timeout
    Hang,
}

/// Verification transport that records prompts instead of calling out
pub struct FakeTransport {
    reply: FakeReply,
    calls: Arc<AtomicUsize>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl FakeTransport {
    pub fn new(reply: FakeReply) -> Self {
        Self {
            reply,
            calls: Arc::new(AtomicUsize::new(0)),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Shared call counter, readable after the transport is boxed away
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    pub fn prompt_log(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.prompts)
    }
}

#[async_trait]
impl VerifierTransport for FakeTransport {
    async fn generate(&self, prompt: &str) -> Result<Value, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());

        match &self.reply {
            FakeReply::Envelope(value) => Ok(value.clone()),
            FakeReply::Timeout => Err(TransportError::Timeout),
            FakeReply::Status(code) => Err(TransportError::Status(*code)),
            FakeReply::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(TransportError::Timeout)
            }
        }
    }
}
