//! Remote model access: retrying caller, system prompts, reply segmenting

pub mod client;
pub mod error;
pub mod prompts;
pub mod retry;
pub mod segment;

pub use client::{RemoteCaller, RemoteRequest, RemoteSettings, Sleeper, TokioSleeper};
pub use error::{RemoteError, RemoteResult};
pub use retry::RetryPolicy;
pub use segment::{segment, DisplaySegment, SegmentKind};
