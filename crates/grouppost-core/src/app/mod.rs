//! App - アプリケーション層
//!
//! ports を組み合わせてユースケースを実装します。
//!
//! # 主要コンポーネント
//! - **AppBuilder**: アプリケーションの構築とワイヤリング
//! - **OAuthFlow**: ログイン URL の生成と code の交換
//! - **GroupLister**: 所属グループの全ページ取得
//! - **PublishFanout**: 複数グループへの同時投稿と状態追跡

pub mod builder;
pub mod group_lister;
pub mod oauth;
pub mod publisher;

#[cfg(test)]
pub(crate) mod testing;

// 主要な型を再エクスポート
pub use self::builder::{App, AppBuilder, BuildError};
pub use self::group_lister::GroupLister;
pub use self::oauth::{LoginRedirect, OAuthFlow, OAuthSettings, verify_state};
pub use self::publisher::{PublishFanout, PublishHandle};
