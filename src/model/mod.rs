//! Social-network domain types persisted through the repositories
//!
//! - `SocialAgent` nodes (label `Agent`) and `Post` nodes
//! - `Follows`, `Friends`, `Blocks`, `Mutes` between agents
//! - `Authored` from an agent to a post

pub mod agent;
pub mod connection;
pub mod post;

pub use agent::{AgentBehavior, ProtocolType, SocialAgent};
pub use connection::{Authored, Blocks, Follows, Friends, Mutes, DEFAULT_WEIGHT};
pub use post::Post;
