//! Core library modules for taskscope.
//!
//! ## Features
//!
//! - **Query Scoping**: visibility-scoped task queries and date filters
//! - **Predicates**: composable conditions rendered to SQL or evaluated in memory
//! - **Collaborators**: caller identity and clock abstractions
//! - **Core Infrastructure**: configuration, data storage, messaging
//! - **User Interface**: console table rendering
//!
//! ## Usage
//!
//! ```rust
//! use taskscope::libs::auth::Caller;
//! use taskscope::libs::clock::SystemClock;
//! use taskscope::libs::scope::TaskQuery;
//!
//! let query = TaskQuery::for_caller(Caller::new(1)).scheduled_between("2025-06-01", "2025-06-30")?;
//! let (sql, params) = query.predicate(&SystemClock).to_sql();
//! assert_eq!(sql, "(creator_id = ? AND scheduled_at >= ? AND scheduled_at <= ?)");
//! assert_eq!(params.len(), 3);
//! # Ok::<(), taskscope::libs::error::ScopeError>(())
//! ```

pub mod auth;
pub mod clock;
pub mod config;
pub mod data_storage;
pub mod error;
pub mod messages;
pub mod predicate;
pub mod scope;
pub mod task;
pub mod view;
