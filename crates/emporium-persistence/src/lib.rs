//! Persistent order collection for emporium.
//!
//! Orders live as one JSON document per order, written atomically (write
//! to a temp file, then rename) so a crash never leaves a half-written
//! document. The accessors mirror the find/update/delete shape the rest
//! of the system is written against.
//!
//! # Example
//!
//! ```no_run
//! use emporium_models::{Order, OrderNumber};
//! use emporium_persistence::{OrderFilter, OrderStore, SortOrder};
//!
//! let store = OrderStore::new("/home/user/.emporium");
//!
//! let order = Order::new(
//!     OrderNumber::from_string("EM-AB12CD"),
//!     "Mechanical keyboard",
//!     1,
//!     "Bank transfer",
//! );
//! store.insert(&order).unwrap();
//!
//! // Query it back
//! let pending = store
//!     .find(&OrderFilter::default(), SortOrder::CreatedDesc, 0)
//!     .unwrap();
//! ```

pub mod atomic;
pub mod error;
pub mod order_store;

pub use error::{PersistenceError, Result};
pub use order_store::{OrderFilter, OrderStore, SortOrder};
