//! 캐싱 모듈
//!
//! Redis 기반 읽기 캐시를 제공합니다. 사용자 리포지토리가 이메일/ID 조회 결과를
//! 10분간 캐싱하고, 쓰기/삭제 시 두 키를 모두 무효화합니다.
//!
//! ```bash
//! REDIS_URL=redis://localhost:6379  # 기본값
//! ```

pub mod redis;
