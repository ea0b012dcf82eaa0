//! 类型系统模块：Agent 运行请求与响应的强类型表示。
//!
//! # Types Module
//!
//! Strongly-typed representations of everything exchanged with the agent run API.
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`AgentKind`] | Discriminator tag (`r1`, `r1-copywriting-light`, ...) |
//! | [`AgentFamily`] | The five processing families, light tiers collapsed |
//! | [`RunRequest`] | Validated run request with family params and defaults |
//! | [`GetRunRequest`] | Parameters for fetching one run |
//! | [`RunResponse`] | Run state: queued, failed, or carrying a family result |
//! | [`CreatedRun`] | Id of a newly created run |
//! | [`MeResponse`] | API key check result |
//!
//! ## Example
//!
//! ```rust
//! use utopian_labs::types::{AgentKind, RunParams, RunRequest};
//! use serde_json::json;
//!
//! let req = RunRequest::from_value(&json!({
//!     "agent": "r1-copywriting",
//!     "lead": { "company": { "website": "acme.com" } }
//! }))
//! .unwrap();
//!
//! assert_eq!(req.agent(), AgentKind::R1Copywriting);
//! match req.params() {
//!     RunParams::Copywriting(p) => assert_eq!(p.sequence_length, 1),
//!     _ => unreachable!(),
//! }
//! ```

pub mod agent;
pub mod me;
pub mod request;
pub mod response;

pub use agent::{AgentFamily, AgentKind};
pub use me::{MeResponse, MeStatus};
pub use request::{
    ClassificationOption, ClassificationParams, Company, CopywritingParams, Event,
    GetRunRequest, LanguageCode, Lead, Person, RunBase, RunParams, RunRequest, LANGUAGE_CODES,
};
pub use response::{
    Classification, CopyMessage, CreatedRun, FailedRun, MessageBody, QueuedRun, Research,
    ResearchStep, RunResponse, RunResult, RunStatus, RunWithResult, Score, Verdict,
};
