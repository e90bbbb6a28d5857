use sha1::{Digest, Sha1};

use crate::state::identity::ElementIdentity;

/// SHA-1 over the ordered identities of a screen's elements.
///
/// Two snapshots exposing the same elements in the same order share a
/// fingerprint. Diagnostic only; deduplication works on identities.
pub fn screen_fingerprint<'a>(identities: impl IntoIterator<Item = &'a ElementIdentity>) -> String {
    let mut hasher = Sha1::new();
    for identity in identities {
        hasher.update(identity.as_str().as_bytes());
        hasher.update(b"\n");
    }
    format!("{:x}", hasher.finalize())
}
