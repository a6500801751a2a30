//! Service-level scenarios over the in-memory store

mod auth_tests;
mod chat_tests;
mod user_tests;
