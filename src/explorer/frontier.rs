use std::collections::HashSet;

use crate::state::identity::ElementIdentity;

/// Identities already attempted in this run.
///
/// Grows monotonically and remembers insertion order so reports list
/// identities in the order they were tried.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontier {
    order: Vec<ElementIdentity>,
    seen: HashSet<ElementIdentity>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `identity` as attempted. Returns `false` if it already was.
    pub fn insert(&mut self, identity: ElementIdentity) -> bool {
        if self.seen.contains(&identity) {
            return false;
        }
        self.seen.insert(identity.clone());
        self.order.push(identity);
        true
    }

    pub fn contains(&self, identity: &ElementIdentity) -> bool {
        self.seen.contains(identity)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Identities in the order they were first attempted.
    pub fn identities(&self) -> &[ElementIdentity] {
        &self.order
    }
}

impl FromIterator<ElementIdentity> for Frontier {
    fn from_iter<I: IntoIterator<Item = ElementIdentity>>(iter: I) -> Self {
        let mut frontier = Frontier::new();
        for identity in iter {
            frontier.insert(identity);
        }
        frontier
    }
}
