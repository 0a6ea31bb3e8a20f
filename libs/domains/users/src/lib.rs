//! Users Domain
//!
//! In-memory user management: create, replace, partially update, delete,
//! and search users by birth date.
//!
//! # Rules
//!
//! - Email must be well formed; first and last name must not be blank
//! - Birth date must be in the past and the user must reach `USER_MIN_AGE`
//! - Phone numbers, when given, are 7 to 10 digits
//! - Search ranges require `from <= to`
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Business rules (minimum age, date ranges)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + in-memory implementation)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs, field validation
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_users::{
//!     config::UserConfig,
//!     handlers,
//!     repository::InMemoryUserRepository,
//!     service::UserService,
//! };
//!
//! let repository = InMemoryUserRepository::new();
//! let service = UserService::new(repository, UserConfig::default());
//!
//! let router = handlers::router(service);
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod validation;

// Re-export commonly used types
pub use config::UserConfig;
pub use error::{UserError, UserResult};
pub use models::{BirthDateRange, PatchUser, User, UserInput};
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
