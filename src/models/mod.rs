//! Data models for marketplace entities.
//!
//! - `Property`: a listing record, shape owned by the remote API
//! - `PropertyDraft`: fields submitted when posting a new listing
//! - `UserProfile`: the signed-in user's profile details

pub mod property;
pub mod user;

pub use property::{Property, PropertyDraft};
pub use user::UserProfile;
