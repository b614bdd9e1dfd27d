//! 세션 검증 강도

/// [`AuthMiddleware`](crate::middlewares::AuthMiddleware)가 세션 없는 요청을 다루는 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// 세션이 없거나 만료되면 401
    Required,
    /// 유효한 세션이면 사용자 정보를 싣고, 아니면 익명으로 통과
    Optional,
}
