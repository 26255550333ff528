pub mod access;
pub mod account_service;
pub mod content_service;
pub mod plan_service;
pub mod purchase_service;
pub mod subscription_service;
