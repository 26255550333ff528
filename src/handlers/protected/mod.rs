// Protected handlers - JWT authentication required.
// Route prefix: /api/*

pub mod auth;
pub mod content;
pub mod plans;
pub mod purchases;
pub mod subscriptions;
