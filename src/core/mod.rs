//! # Core Module
//!
//! 싱글톤 컴포넌트 레지스트리를 제공합니다. 자세한 동작은 [`registry`] 참고.

pub mod registry;

pub use registry::*;
