pub mod download;
pub mod health;
pub mod remove_bg;
pub mod status;
