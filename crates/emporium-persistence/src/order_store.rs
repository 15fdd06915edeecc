//! The order collection.

use std::fs;
use std::path::PathBuf;

use emporium_models::{Order, OrderNumber, OrderStatus};
use regex::{Regex, RegexBuilder};
use tracing::warn;

use crate::atomic::{atomic_write_json, read_json, read_json_optional};
use crate::error::{PersistenceError, Result};

/// Typed query over the order collection. Every field is optional; an
/// empty filter matches everything.
#[derive(Debug, Default)]
pub struct OrderFilter {
    /// Match a specific lifecycle status.
    pub status: Option<OrderStatus>,
    /// Match the archived flag.
    pub archived: Option<bool>,
    /// Match the unread-customer-message flag.
    pub unread_customer_message: Option<bool>,
    /// Case-insensitive search over order number, product name, and
    /// transaction id.
    pub matches: Option<Regex>,
}

impl OrderFilter {
    /// Builds a search filter from a raw operator-supplied term.
    ///
    /// The term is escaped, so it matches literally rather than as a
    /// pattern.
    pub fn search(term: &str) -> Self {
        // An escaped literal only fails to compile past the regex size
        // limit; treat that as an impossible search.
        let matches = RegexBuilder::new(&regex::escape(term))
            .case_insensitive(true)
            .build()
            .ok();
        if matches.is_none() {
            warn!(term = %term, "Search term too large to compile, ignoring");
        }
        Self {
            matches,
            ..Self::default()
        }
    }

    fn accepts(&self, order: &Order) -> bool {
        if let Some(status) = self.status {
            if order.status != status {
                return false;
            }
        }
        if let Some(archived) = self.archived {
            if order.archived != archived {
                return false;
            }
        }
        if let Some(unread) = self.unread_customer_message {
            if order.unread_customer_message != unread {
                return false;
            }
        }
        if let Some(re) = &self.matches {
            let hit = re.is_match(order.order_number.as_str())
                || re.is_match(&order.product_name)
                || order
                    .transaction_id
                    .as_deref()
                    .is_some_and(|tx| re.is_match(tx));
            if !hit {
                return false;
            }
        }
        true
    }
}

/// Sort order for [`OrderStore::find`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Newest orders first.
    CreatedDesc,
    /// Oldest orders first.
    CreatedAsc,
}

/// Manages persistence of orders.
///
/// Orders are stored as individual JSON files keyed by order number:
/// ```text
/// base_path/
/// └── orders/
///     ├── EM-AB12CD.json
///     └── EM-EF34GH.json
/// ```
pub struct OrderStore {
    base_path: PathBuf,
}

impl OrderStore {
    /// Creates a new OrderStore rooted at the given base path.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn orders_dir(&self) -> PathBuf {
        self.base_path.join("orders")
    }

    fn order_path(&self, number: &OrderNumber) -> PathBuf {
        self.orders_dir().join(format!("{}.json", number))
    }

    /// Inserts or replaces an order document.
    pub fn insert(&self, order: &Order) -> Result<()> {
        atomic_write_json(&self.order_path(&order.order_number), order)
    }

    /// Loads an order by number, `Ok(None)` when it does not exist.
    pub fn find_one(&self, number: &OrderNumber) -> Result<Option<Order>> {
        read_json_optional(&self.order_path(number))
    }

    /// Loads an order, applies the mutation, and persists the result
    /// atomically. Returns the updated document, or `Ok(None)` when no
    /// such order exists.
    pub fn find_one_and_update<F>(&self, number: &OrderNumber, mutate: F) -> Result<Option<Order>>
    where
        F: FnOnce(&mut Order),
    {
        let Some(mut order) = self.find_one(number)? else {
            return Ok(None);
        };
        mutate(&mut order);
        atomic_write_json(&self.order_path(number), &order)?;
        Ok(Some(order))
    }

    /// Deletes an order only when the predicate accepts it, returning
    /// the deleted document. `Ok(None)` covers both a missing order and
    /// a rejected predicate.
    pub fn find_one_and_delete<F>(&self, number: &OrderNumber, predicate: F) -> Result<Option<Order>>
    where
        F: FnOnce(&Order) -> bool,
    {
        let Some(order) = self.find_one(number)? else {
            return Ok(None);
        };
        if !predicate(&order) {
            return Ok(None);
        }
        let path = self.order_path(number);
        fs::remove_file(&path).map_err(|source| PersistenceError::WriteError { path, source })?;
        Ok(Some(order))
    }

    /// Queries the collection. `limit == 0` means unlimited.
    ///
    /// Documents that fail to parse are skipped with a warning so one
    /// corrupt file never breaks every listing.
    pub fn find(&self, filter: &OrderFilter, sort: SortOrder, limit: usize) -> Result<Vec<Order>> {
        let dir = self.orders_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&dir).map_err(|source| PersistenceError::ReadError {
            path: dir.clone(),
            source,
        })?;

        let mut orders = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| PersistenceError::ReadError {
                path: dir.clone(),
                source,
            })?;

            let path = entry.path();
            if !path.extension().is_some_and(|ext| ext == "json") {
                continue;
            }
            match read_json::<Order>(&path) {
                Ok(order) => {
                    if filter.accepts(&order) {
                        orders.push(order);
                    }
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping unreadable order document");
                }
            }
        }

        orders.sort_by(|a, b| match sort {
            SortOrder::CreatedDesc => b.created_at.cmp(&a.created_at),
            SortOrder::CreatedAsc => a.created_at.cmp(&b.created_at),
        });

        if limit > 0 {
            orders.truncate(limit);
        }

        Ok(orders)
    }
}
