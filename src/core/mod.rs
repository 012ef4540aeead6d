//! In-memory authoritative store and index helpers.

/// Insertion-ordered map used for record storage.
pub mod indices;
/// Authoritative book/member store and issue/return rules.
pub mod store;
