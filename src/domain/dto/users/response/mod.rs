//! 사용자 관련 응답 DTO

pub mod user_response;

pub use user_response::{AuthResponse, MessagesResponse, UserResponse};
