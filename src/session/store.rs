//! Session Store Module
//!
//! Authentication state, cart and wishlist for one storefront session.
//! Every mutation goes through a named operation and publishes a fresh
//! snapshot to subscribers.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::debug;

use crate::error::{EdgeError, Result};
use crate::session::CartItem;

/// Where the login flow should send the user back to after checkout fails.
pub const CHECKOUT_RETURN_PATH: &str = "/cart";

// == Session Info ==
/// Profile summary of the logged-in customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionInfo {
    pub is_logged_in: bool,
    pub user: Option<UserProfile>,
}

// == Snapshot ==
/// What subscribers observe after each mutation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub session: SessionInfo,
    pub items: Vec<CartItem>,
    pub wishlist: Vec<CartItem>,
    pub count: u64,
    pub total_minor: i64,
}

/// Result of a checkout that passed validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutSummary {
    pub item_count: u64,
    pub total: f64,
}

// == Session Store ==
#[derive(Debug)]
pub struct SessionStore {
    session: SessionInfo,
    items: Vec<CartItem>,
    wishlist: Vec<CartItem>,
    publisher: watch::Sender<SessionSnapshot>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        let (publisher, _) = watch::channel(SessionSnapshot::default());
        Self {
            session: SessionInfo::default(),
            items: Vec::new(),
            wishlist: Vec::new(),
            publisher,
        }
    }

    /// Receives a snapshot after every mutation.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.publisher.subscribe()
    }

    // == Session ==
    pub fn login(&mut self, user: UserProfile) {
        debug!("Session login for {}", user.id);
        self.session = SessionInfo {
            is_logged_in: true,
            user: Some(user),
        };
        self.publish();
    }

    pub fn logout(&mut self) {
        self.session = SessionInfo::default();
        self.publish();
    }

    pub fn session(&self) -> &SessionInfo {
        &self.session
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_logged_in
    }

    // == Cart ==
    /// Adds `item`. An existing id has its quantity increased by the added
    /// quantity; a new id is appended. Quantities below 1 count as 1.
    pub fn add_to_cart(&mut self, mut item: CartItem) {
        let quantity = item.quantity.max(1);

        match self.items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(quantity),
            None => {
                item.quantity = quantity;
                self.items.push(item);
            }
        }
        self.publish();
    }

    /// Sets an item's quantity exactly; zero or less removes it. Unknown
    /// ids are ignored.
    pub fn update_quantity(&mut self, id: &str, quantity: i64) {
        if quantity <= 0 {
            self.remove_from_cart(id);
            return;
        }

        if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
            item.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
            self.publish();
        }
    }

    pub fn remove_from_cart(&mut self, id: &str) {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        if self.items.len() != before {
            self.publish();
        }
    }

    pub fn clear_cart(&mut self) {
        self.items.clear();
        self.publish();
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Cart total in minor units. Saturates instead of overflowing.
    pub fn total_minor(&self) -> i64 {
        self.items
            .iter()
            .map(CartItem::line_total_minor)
            .fold(0i64, i64::saturating_add)
    }

    // == Total ==
    /// Cart total in major units, accumulated in minor units.
    pub fn total(&self) -> f64 {
        self.total_minor() as f64 / 100.0
    }

    // == Count ==
    /// Sum of quantities, not the number of distinct items.
    pub fn count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    // == Checkout ==
    /// Validates that checkout may proceed. State is left unchanged; order
    /// creation and payment happen elsewhere.
    pub fn checkout(&self) -> Result<CheckoutSummary> {
        if !self.session.is_logged_in {
            return Err(EdgeError::NotAuthenticated {
                return_to: CHECKOUT_RETURN_PATH.to_string(),
            });
        }
        if self.items.is_empty() {
            return Err(EdgeError::EmptyCart);
        }

        Ok(CheckoutSummary {
            item_count: self.count(),
            total: self.total(),
        })
    }

    // == Wishlist ==
    /// Adds the item if absent, removes it if present. Returns whether the
    /// item is now in the wishlist.
    pub fn toggle_wishlist(&mut self, item: CartItem) -> bool {
        let before = self.wishlist.len();
        self.wishlist.retain(|existing| existing.id != item.id);
        let added = self.wishlist.len() == before;
        if added {
            self.wishlist.push(item);
        }
        self.publish();
        added
    }

    pub fn wishlist(&self) -> &[CartItem] {
        &self.wishlist
    }

    fn publish(&self) {
        self.publisher.send_replace(SessionSnapshot {
            session: self.session.clone(),
            items: self.items.clone(),
            wishlist: self.wishlist.clone(),
            count: self.count(),
            total_minor: self.total_minor(),
        });
    }
}
