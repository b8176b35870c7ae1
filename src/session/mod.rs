//! Session Module
//!
//! Cart, wishlist and authentication state shared with UI consumers.

mod cart;
mod store;


pub use cart::{parse_amount, CartItem, Price};
pub use store::{
    CheckoutSummary, SessionInfo, SessionSnapshot, SessionStore, UserProfile,
    CHECKOUT_RETURN_PATH,
};
