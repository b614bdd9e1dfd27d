pub mod avatar_repo;

pub use avatar_repo::{AvatarRepository, AvatarStore};
