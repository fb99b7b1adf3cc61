//! Trabuddy HTTP client
//!
//! Typed wrappers over the Trabuddy REST API, the transport layer beneath
//! them, and the silent token-refresh recovery every call goes through.

pub mod client;
pub mod types;

pub use client::{
    Attempt, ClientError, HttpTransport, MockRequest, MockResponse, MockTransport,
    PendingRequest, RawResponse, RefreshFailure, TrabuddyClient, Transport,
};
