//! Test Helper Utilities
//!
//! Shared fakes and fixtures for plantguard-id integration tests

pub mod fakes;
pub mod fixtures;

#[allow(unused_imports)]
pub use fakes::{FakeReply, FakeTransport, StubClassifier, PANIC_DETAIL};
#[allow(unused_imports)]
pub use fixtures::{
    envelope, multipart_request, sample_inventory, sample_png, test_app, SAMPLE_PROBABILITIES,
};
