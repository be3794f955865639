//! Domain model (IDs, sessions, groups, publish targets, errors).

pub mod errors;
pub mod group;
pub mod ids;
pub mod publish;
pub mod session;

pub use self::errors::GroupPostError;
pub use self::group::{Group, GroupPage, Paging};
pub use self::ids::{IdParseError, PublishId, SessionId};
pub use self::publish::{
    PostRequest, PostedRef, PublishCounts, PublishResult, PublishSnapshot, PublishStatus,
    PublishTarget,
};
pub use self::session::{AccessToken, Profile, Session};
