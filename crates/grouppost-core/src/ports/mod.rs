//! Ports - 抽象化レイヤー
//!
//! 外部システム（OAuth/Graph プロバイダ、セッション保存先、状態の通知先）への
//! インターフェースを trait として定義し、実装の詳細を隠蔽します。
//!
//! # 設計原則
//! - Session の保存先は差し替え可能（開発用は InMemory、将来は永続ストア）
//! - プロバイダ呼び出しは `GraphApi` に閉じ込め、テストでは fake を使う
//! - fan-out の状態は `PublishTracker` に集約し、呼び出し側は poll か subscribe で観測する

pub mod clock;
pub mod graph_api;
pub mod id_generator;
pub mod publish_tracker;
pub mod session_store;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::graph_api::{CodeExchange, GraphApi};
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::publish_tracker::PublishTracker;
pub use self::session_store::SessionStore;
