//! Postgres-backed repository tests

mod postgres_tests;
