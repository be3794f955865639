//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **InMemorySessionStore**: プロセス内の Session 保存（再起動で消える）
//! - **InMemoryPublishTracker**: fan-out の状態集約 + watch による通知
//! - **HttpGraphApi**: reqwest による Graph API クライアント

pub mod http_graph;
pub mod inmem_session;
pub mod inmem_tracker;

pub use self::http_graph::{GraphEndpoints, HttpGraphApi};
pub use self::inmem_session::InMemorySessionStore;
pub use self::inmem_tracker::InMemoryPublishTracker;
