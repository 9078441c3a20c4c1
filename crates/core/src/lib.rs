//! Ghostline Core
//!
//! Foundational traits, error types, and shared capabilities for the Ghostline
//! Studio workspace. This crate has zero dependencies on application-level code
//! (HTTP clients, storage, editor buffers, etc.).
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `context` - Read-only shared context capability (`SharedContext`)
//! - `graph` - Semantic graph capability and the in-memory `CodeGraph`
//! - `agent` - Agent result envelope (`AgentResult`)
//! - `proxy` - Proxy configuration data types shared across workspace crates
//! - `streaming` - Stream event types and line adapter trait
//!
//! ## Design Principles
//!
//! 1. **Zero external dependencies beyond serde/async-trait/thiserror** - keeps build times minimal
//! 2. **Trait-based abstractions** - enables mocking, testing, and future crate splitting
//! 3. **Unidirectional dependency** - this crate depends on nothing else in the workspace

pub mod agent;
pub mod context;
pub mod error;
pub mod graph;
pub mod proxy;
pub mod streaming;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Shared Context ─────────────────────────────────────────────────────
pub use context::{SharedContext, StaticContext};

// ── Semantic Graph ─────────────────────────────────────────────────────
pub use graph::{churn_hotspots, CodeGraph, GraphEdge, GraphNode, SemanticGraph};

// ── Agent Results ──────────────────────────────────────────────────────
pub use agent::{AgentResult, AGENT_ERROR_NAME};

// ── Proxy Types ────────────────────────────────────────────────────────
pub use proxy::{ProxyConfig, ProxyProtocol};

// ── Streaming Types ────────────────────────────────────────────────────
pub use streaming::{AdapterError, StreamAdapter, StreamEvent};
