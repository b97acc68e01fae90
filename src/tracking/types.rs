//! Identifier types for tracking methods and subscriptions.

/// Stable identifier of a tracking method within a session.
///
/// Ids follow the native engine's numbering and are never reused across
/// variants: marker tracking is [`TrackingMethodId::MARKER`], markerless
/// (floor-relative) tracking is [`TrackingMethodId::MARKERLESS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackingMethodId(pub u32);

impl TrackingMethodId {
    pub const MARKER: Self = Self(0);
    pub const MARKERLESS: Self = Self(1);

    /// Create a new TrackingMethodId with the given value.
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for TrackingMethodId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle returned by `subscribe`, used to remove a pose listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SUB{}", self.0)
    }
}
