//! # aegyptus-store: Cart Persistence for the AEGYPTUS Bazaar
//!
//! Keeps a shopper's cart across page reloads and restarts by writing it
//! to a key/value store after every applied change.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bazaar Cart Data Flow                            │
//! │                                                                         │
//! │  Storefront action (add to cart, +/-, remove, place order)             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  aegyptus-store (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐ │   │
//! │  │   │  CartSession  │───►│CartPersistence │───►│KeyValueStore │ │   │
//! │  │   │ (session.rs)  │    │(persistence.rs)│    │  (storage/)  │ │   │
//! │  │   │               │    │                │    │              │ │   │
//! │  │   │ mutate+flush  │    │ load / save    │    │ MemoryStore  │ │   │
//! │  │   │ rebind        │    │ corrupt → []   │    │ SqliteStore  │ │   │
//! │  │   │ checkout      │    │ degraded mode  │    │              │ │   │
//! │  │   └───────────────┘    └────────────────┘    └──────────────┘ │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   ~/.local/share/aegyptus-bazaar/bazaar.db (cart_storage)       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`session`] - A live cart bound to a storage key
//! - [`persistence`] - Load/save of the persisted cart layout
//! - [`storage`] - Key/value stores (in-memory and SQLite)
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`checkout`] - Order collaborator trait
//! - [`config`] - Layered configuration
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use aegyptus_store::{BazaarConfig, CartSession, Database, DbConfig};
//! use aegyptus_core::CartScope;
//!
//! let config = BazaarConfig::load(None)?;
//! let db = Database::new(DbConfig::new(config.database_path())).await?;
//!
//! let mut session =
//!     CartSession::open_scope(db.cart_store(), config.key_prefix(), &CartScope::Global).await;
//! session.add_item(&snapshot).await;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod config;
pub mod error;
pub mod migrations;
pub mod persistence;
pub mod pool;
pub mod session;
pub mod storage;

// =============================================================================
// Re-exports
// =============================================================================

pub use checkout::OrderSubmitter;
pub use config::BazaarConfig;
pub use error::{StoreError, StoreResult};
pub use persistence::{CartPersistence, SaveStatus};
pub use pool::{Database, DbConfig};
pub use session::CartSession;
pub use storage::{KeyValueStore, MemoryStore, SqliteStore};
