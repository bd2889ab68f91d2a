//! Status codes carried in response bodies
//!
//! 0 is success, negative values are failure kinds. Classifier codes are
//! passed through to callers verbatim.

pub const OK: i32 = 0;

/// Classifier has no scoring backend configured
pub const MODEL_NOT_READY: i32 = -1;

/// Scoring backend ran but failed or produced unusable output
pub const INFERENCE_FAILED: i32 = -2;

/// Image handed to the classifier has no pixels
pub const INVALID_IMAGE: i32 = -3;

/// Classification succeeded but produced no species candidates
pub const NO_CANDIDATES: i32 = -4;

/// Malformed request or upload
pub const BAD_REQUEST: i32 = -10;

/// Anything unexpected at the serving boundary
pub const SERVER_ERROR: i32 = -999;
