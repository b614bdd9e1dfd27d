//! 사용자 저장소

pub mod user_store;
pub mod user_repo;

pub use user_store::UserStore;
pub use user_repo::UserRepository;
