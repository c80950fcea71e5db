use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a trade.
///
/// Wraps a UUID to provide type safety and prevent mixing up
/// trade identifiers with other UUID-based identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TradeId(Uuid);

impl TradeId {
    /// Creates a new random trade ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a trade ID from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for TradeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TradeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for TradeId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<TradeId> for Uuid {
    fn from(id: TradeId) -> Self {
        id.0
    }
}

/// Unique identifier for a published offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OfferId(Uuid);

impl OfferId {
    /// Creates a new random offer ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an offer ID from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for OfferId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for OfferId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for OfferId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<OfferId> for Uuid {
    fn from(id: OfferId) -> Self {
        id.0
    }
}

/// Unique identifier for a trading party (buyer or seller).
///
/// Party identities are assigned by the surrounding system; the core only
/// compares them for authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartyId(Uuid);

impl PartyId {
    /// Creates a new random party ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a party ID from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for PartyId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PartyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for PartyId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<PartyId> for Uuid {
    fn from(id: PartyId) -> Self {
        id.0
    }
}
