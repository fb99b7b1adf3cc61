//! Trabuddy core types and utilities

pub mod config;
pub mod date;
pub mod error;
pub mod pattern;
pub mod session;
pub mod storage;
pub mod types;

pub use config::{ApiConfig, AuthConfig, ClientConfig, LoggingConfig};
pub use error::{CoreError, CoreResult};
pub use pattern::{PathParams, PathPattern};
pub use session::{AuthContext, IdentityState, MemoryNavigator, Navigator, RedirectState, TokenStore};
pub use storage::{KeyValueStore, MemoryStore};
pub use types::{
    AreaItem, AttractionItem, Credentials, InviteCodeItem, InviteInfoItem, Pagination,
    ParticipantItem, ParticipantRole, PlanItem, PlanTheme, PointItem, Sex, UserIdentity,
    UserProfile, Visibility,
};
