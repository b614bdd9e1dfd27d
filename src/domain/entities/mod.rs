//! # Domain Entities Module
//!
//! MongoDB 컬렉션과 1:1로 대응되는 영속 엔티티들입니다.
//!
//! ```text
//! Domain Layer
//! ├── entities/     ← 이 모듈
//! │   ├── users/    ← `users` 컬렉션 (User)
//! │   └── avatars/  ← `avatars` 컬렉션 (AvatarAsset)
//! ├── models/       ← 외부 프로바이더 모델, 세션/플래시 값 객체
//! └── dto/          ← 요청/응답 데이터 전송 객체
//! ```
//!
//! 모든 엔티티는 `_id`를 `Option<ObjectId>`로 갖고, 삽입 전에는 `None`입니다.
//! 시간 필드는 `bson::DateTime`을 사용합니다.

pub mod users;
pub mod avatars;
