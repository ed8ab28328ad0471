// asyncpipe/demos/saas_app/src/models/mod.rs

//! Plain data records kept by the in-memory store.

pub mod invite_link;
pub mod membership;
pub mod organization;
pub mod session;
pub mod user;

pub use invite_link::InviteLink;
pub use membership::{Membership, Role};
pub use organization::Organization;
pub use session::Session;
pub use user::User;
