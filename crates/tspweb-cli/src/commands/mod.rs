pub mod demo;
pub mod export;
pub mod inspect;
pub mod play;
pub mod sessions;
pub mod status;
