//! Application layer - orchestrates domain operations across ports.
//!
//! Each handler validates its input, performs the persistence write,
//! and only then hands the committed row to the broadcaster. Broadcast
//! failures never propagate back to the caller.

pub mod commentary;
pub mod matches;

pub use commentary::{ListCommentaryHandler, PostCommentaryHandler};
pub use matches::{CreateMatchHandler, ListMatchesHandler};

/// Hard cap on list page sizes.
pub const MAX_LIMIT: u32 = 100;

/// Page size used when the client does not ask for one.
pub const DEFAULT_LIMIT: u32 = 50;

/// Clamps a requested page size into `1..=MAX_LIMIT`.
pub(crate) fn clamp_limit(requested: Option<u32>) -> u32 {
    match requested {
        Some(0) | None => DEFAULT_LIMIT,
        Some(n) => n.min(MAX_LIMIT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_limit_uses_default() {
        assert_eq!(clamp_limit(None), DEFAULT_LIMIT);
    }

    #[test]
    fn zero_limit_uses_default() {
        assert_eq!(clamp_limit(Some(0)), DEFAULT_LIMIT);
    }

    #[test]
    fn oversized_limit_is_capped() {
        assert_eq!(clamp_limit(Some(5000)), MAX_LIMIT);
    }

    #[test]
    fn in_range_limit_passes_through() {
        assert_eq!(clamp_limit(Some(25)), 25);
    }
}
