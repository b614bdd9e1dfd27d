pub mod flash_message;

pub use flash_message::{FlashLevel, FlashMessage};
