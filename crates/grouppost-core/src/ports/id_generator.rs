//! IdGenerator port - ID 生成の抽象化
//!
//! # 実装
//! - **UlidGenerator**: Clock の時刻 + 乱数で ULID を作る

use crate::domain::ids::{PublishId, SessionId};
use crate::ports::Clock;
use ulid::Ulid;

/// IdGenerator は Session / Publish の ID を生成
///
/// SessionId は OAuth の state としてブラウザに渡るので、推測できないよう
/// 乱数部分（80 bit）を必ず含めること。
pub trait IdGenerator: Send + Sync {
    fn generate_session_id(&self) -> SessionId;

    fn generate_publish_id(&self) -> PublishId;
}

pub struct UlidGenerator<C> {
    clock: C,
}

impl<C: Clock> UlidGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    fn next_ulid(&self) -> Ulid {
        let timestamp_ms = self.clock.now().timestamp_millis() as u64;
        Ulid::from_parts(timestamp_ms, rand::random())
    }
}

impl<C: Clock> IdGenerator for UlidGenerator<C> {
    fn generate_session_id(&self) -> SessionId {
        SessionId::from(self.next_ulid())
    }

    fn generate_publish_id(&self) -> PublishId {
        PublishId::from(self.next_ulid())
    }
}
