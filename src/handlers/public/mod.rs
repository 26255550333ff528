// Public handlers - no authentication required.
// Route prefix: /auth/*

pub mod auth;
