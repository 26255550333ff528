pub mod content;
pub mod plan;
pub mod purchase;
pub mod subscription;
pub mod user;
