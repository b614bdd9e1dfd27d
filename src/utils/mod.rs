//! 공통 유틸리티 함수 모듈
//!
//! - [`string_utils`] - 이메일 정규화, 입력 문자열 정리
//! - [`display_terminal`] - 시작 시 레지스트리 초기화 출력

pub mod string_utils;
pub mod display_terminal;
