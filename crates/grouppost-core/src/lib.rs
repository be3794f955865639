//! grouppost-core
//!
//! Facebook グループへの一括投稿サービスのコア。
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, session, group, publish, errors）
//! - **ports**: 抽象化レイヤー（GraphApi, SessionStore, PublishTracker, Clock, IdGenerator）
//! - **app**: ユースケース（builder, oauth, group_lister, publisher）
//! - **impls**: 実装（HttpGraphApi, InMemorySessionStore, InMemoryPublishTracker）

pub mod app;
pub mod domain;
pub mod impls;
pub mod ports;
