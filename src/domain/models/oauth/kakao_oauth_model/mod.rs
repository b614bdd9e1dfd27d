pub mod kakao_user;

pub use kakao_user::{KakaoAccount, KakaoProperties, KakaoUnlinkResponse, KakaoUserMe};
