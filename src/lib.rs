//! # LinkMe
//!
//! Social networking backend:
//! - RESTful HTTP API with bearer-token authentication
//! - Follows, posts, likes, comments and deduplicated notifications
//! - One-to-one chat with unread counters, stickers and presence
//! - PostgreSQL for persistent storage
//! - Redis for presence and pub/sub events
//! - A typed client with state stores for frontends
//!
//! ## Architecture
//!
//! The crate follows Clean Architecture principles:
//!
//! - **Domain Layer**: Core business entities, repository traits and ports
//! - **Application Layer**: Business logic services and DTOs
//! - **Infrastructure Layer**: Database, Redis and metrics implementations
//! - **Presentation Layer**: HTTP routes, handlers and middleware
//!
//! ## Module Structure
//!
//! ```text
//! linkme/
//! +-- config/         Configuration management
//! +-- domain/         Entities, repository traits, events, presence
//! +-- application/    Application services and DTOs
//! +-- infrastructure/ Database, Redis and metrics
//! +-- presentation/   HTTP routes and middleware
//! +-- client/         Typed API client and state stores
//! +-- shared/         Errors, validation, snowflake IDs
//! ```

// Configuration module
pub mod config;

// Domain layer - Core business logic
pub mod domain;

// Application layer - Business services
pub mod application;

// Infrastructure layer - External implementations
pub mod infrastructure;

// Presentation layer - HTTP handlers
pub mod presentation;

// Frontend client and state stores
pub mod client;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
