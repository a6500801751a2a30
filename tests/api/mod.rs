//! HTTP-level tests against the assembled router

mod auth_tests;
mod health_tests;
