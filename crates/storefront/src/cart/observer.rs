//! Mutation notifications.

use bella_core::{ProductId, Quantity};

use super::state::Cart;

/// What a mutation did.
///
/// Events are emitted for every call, including calls on ids that are not in
/// the cart; `matched` tells the two apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    Added { id: ProductId, quantity: Quantity },
    Increased { id: ProductId, matched: bool },
    Decreased { id: ProductId, matched: bool },
    Removed { id: ProductId, matched: bool },
    Cleared,
}

impl CartEvent {
    /// Short name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Added { .. } => "added",
            Self::Increased { .. } => "increased",
            Self::Decreased { .. } => "decreased",
            Self::Removed { .. } => "removed",
            Self::Cleared => "cleared",
        }
    }
}

/// Receives the cart state after each mutation.
///
/// Observers run synchronously, before the mutating call returns. They cannot
/// fail the mutation; an observer that hits an error must handle it itself.
pub trait CartObserver {
    fn cart_changed(&mut self, event: &CartEvent, cart: &Cart);
}

impl<F> CartObserver for F
where
    F: FnMut(&CartEvent, &Cart),
{
    fn cart_changed(&mut self, event: &CartEvent, cart: &Cart) {
        self(event, cart);
    }
}
