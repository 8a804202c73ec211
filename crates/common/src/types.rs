use crate::error::DecodeError;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Canonical 20-byte chain address.
///
/// Parsing accepts mixed-case hex with or without the `0x` prefix; the
/// canonical form (Display, serde, equality) is lowercase `0x`-prefixed hex.
/// Equality is exact byte equality, so case differences in input never
/// produce two distinct addresses.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; 20]);

impl Address {
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

fn hex_nibble(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

impl FromStr for Address {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if hex.len() != 40 {
            return Err(DecodeError::InvalidAddress(s.to_string()));
        }
        let mut bytes = [0_u8; 20];
        for (i, pair) in hex.as_bytes().chunks_exact(2).enumerate() {
            match (hex_nibble(pair[0]), hex_nibble(pair[1])) {
                (Some(hi), Some(lo)) => bytes[i] = (hi << 4) | lo,
                _ => return Err(DecodeError::InvalidAddress(s.to_string())),
            }
        }
        Ok(Self(bytes))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for b in self.0 {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

/// Token amount in base units (18-decimal fixed point).
///
/// Carried as raw integer base units end to end; decimal formatting is the
/// caller's concern. Serialized as a decimal string because JSON numbers
/// cannot hold the full range.
pub type Amount = u128;

/// Signed amount in base units, for net-profit style figures.
pub type SignedAmount = i128;

/// Serde adapter: `u128` base units as a decimal string.
pub mod amount_str {
    use super::{Amount, Deserialize, Deserializer, Serializer};
    use serde::de::Error as _;

    pub fn serialize<S: Serializer>(v: &Amount, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(v)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Amount, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse()
            .map_err(|_| D::Error::custom(format!("invalid amount: {s}")))
    }
}

/// Serde adapter: `i128` base units as a decimal string.
pub mod signed_amount_str {
    use super::{Deserialize, Deserializer, Serializer, SignedAmount};
    use serde::de::Error as _;

    pub fn serialize<S: Serializer>(v: &SignedAmount, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(v)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<SignedAmount, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse()
            .map_err(|_| D::Error::custom(format!("invalid amount: {s}")))
    }
}

/// Debate lifecycle status. The wire encoding is the numeric code; any other
/// value is a decode failure, not a fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebateStatus {
    Active,
    Resolving,
    Resolved,
    Undetermined,
}

impl DebateStatus {
    pub fn code(self) -> u8 {
        match self {
            Self::Active => 0,
            Self::Resolving => 1,
            Self::Resolved => 2,
            Self::Undetermined => 3,
        }
    }

    pub fn from_code(code: u8) -> Result<Self, DecodeError> {
        match code {
            0 => Ok(Self::Active),
            1 => Ok(Self::Resolving),
            2 => Ok(Self::Resolved),
            3 => Ok(Self::Undetermined),
            other => Err(DecodeError::UnknownStatus(other)),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Resolving => "resolving",
            Self::Resolved => "resolved",
            Self::Undetermined => "undetermined",
        }
    }
}

/// The two competing positions within a debate. Scan order is always A
/// before B.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "a",
            Self::B => "b",
        }
    }
}

/// One staked argument on one side of a debate. Append-only on the source
/// side; aggregation reads only `author` and `amount`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    pub author: Address,
    pub content: String,
    pub timestamp: u64,
    pub amount: Amount,
}

/// Full debate metadata tuple as reported by a Debate instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebateInfo {
    pub creator: Address,
    pub statement: String,
    pub description: String,
    pub side_a_name: String,
    pub side_b_name: String,
    pub creation_date: u64,
    pub end_date: u64,
    pub is_resolved: bool,
    pub is_side_a_winner: bool,
    pub locked_a: Amount,
    pub unlocked_a: Amount,
    pub locked_b: Amount,
    pub unlocked_b: Amount,
    pub winner_reasoning: String,
    pub content_bytes: u64,
    pub max_content_bytes: u64,
    pub bounty: Amount,
}

impl DebateInfo {
    /// Side pools are reported as separate locked/unlocked sub-balances;
    /// summaries carry the sum.
    pub fn total_side_a(&self) -> Amount {
        self.locked_a + self.unlocked_a
    }

    pub fn total_side_b(&self) -> Amount {
        self.locked_b + self.unlocked_b
    }
}

/// Per-debate summary row, recomputed on every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DebateSummary {
    pub address: Address,
    pub creator: Address,
    pub end_date: u64,
    pub status: DebateStatus,
    #[serde(with = "amount_str")]
    pub total_side_a: Amount,
    #[serde(with = "amount_str")]
    pub total_side_b: Amount,
    #[serde(with = "amount_str")]
    pub total_bounty: Amount,
    pub argument_count_a: u64,
    pub argument_count_b: u64,
}

/// Per-author accumulator over one aggregation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipantRecord {
    pub address: Address,
    pub arguments_written: u64,
    #[serde(with = "amount_str")]
    pub amount_staked: Amount,
}

/// Cross-debate per-user ledger row from the Factory. Opaque to the reader:
/// batched through as-is, never recomputed or validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentStats {
    pub address: Address,
    #[serde(with = "amount_str")]
    pub total_winnings: Amount,
    #[serde(with = "amount_str")]
    pub total_bets: Amount,
    pub debates_participated: u64,
    pub debates_won: u64,
    #[serde(with = "amount_str")]
    pub total_claimed: Amount,
    #[serde(with = "signed_amount_str")]
    pub net_profit: SignedAmount,
    pub win_rate_bps: u32,
}

/// The Factory's five lifecycle counters, passed through in one round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlatformStats {
    pub total_debates: u64,
    pub active_debates: u64,
    pub resolving_debates: u64,
    pub resolved_debates: u64,
    pub undetermined_debates: u64,
}

/// Platform-wide sums over a debate list, computed in a single pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlatformAggregate {
    #[serde(with = "amount_str")]
    pub total_volume: Amount,
    #[serde(with = "amount_str")]
    pub total_bounties: Amount,
    pub total_arguments: u64,
    pub unique_participants: u64,
}
