pub mod cookies;
pub mod http;
pub mod navigation;
pub mod protocol;
pub mod repositories;
