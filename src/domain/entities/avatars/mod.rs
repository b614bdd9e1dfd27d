pub mod avatar;

pub use avatar::AvatarAsset;
