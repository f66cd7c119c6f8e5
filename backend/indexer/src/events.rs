//! Canonical event types emitted by the SmartFunding contract.
//!
//! These mirror the Soroban contract events defined in
//! `contracts/smart_funding/src/events.rs`.

use serde::{Deserialize, Serialize};

use crate::errors::{IndexerError, Result};

/// All recognised event kinds from the SmartFunding contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// The owner configured goal and window (`init` topic).
    Initialized,
    /// An investor added currency to the pool (`invest` topic).
    Invested,
    /// An investor was paid their reward tokens (`claim` topic).
    RewardClaimed,
    /// An investor withdrew their currency (`refund` topic).
    Refunded,
    /// An event from this contract that we don't recognise yet.
    Unknown,
}

impl EventKind {
    /// Parse the leading topic symbol string produced by Soroban into an [`EventKind`].
    pub fn from_topic(topic: &str) -> Self {
        match topic {
            "init" => Self::Initialized,
            "invest" => Self::Invested,
            "claim" => Self::RewardClaimed,
            "refund" => Self::Refunded,
            _ => Self::Unknown,
        }
    }

    /// Return a short identifier string suitable for storage in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initialized => "initialized",
            Self::Invested => "invested",
            Self::RewardClaimed => "reward_claimed",
            Self::Refunded => "refunded",
            Self::Unknown => "unknown",
        }
    }

    /// Inverse of [`EventKind::as_str`].
    pub fn from_stored(s: &str) -> Self {
        match s {
            "initialized" => Self::Initialized,
            "invested" => Self::Invested,
            "reward_claimed" => Self::RewardClaimed,
            "refunded" => Self::Refunded,
            _ => Self::Unknown,
        }
    }

    /// Events whose leading topic is followed by the investor address.
    pub fn has_investor(&self) -> bool {
        matches!(self, Self::Invested | Self::RewardClaimed | Self::Refunded)
    }
}

/// A fully decoded SmartFunding event, ready to be stored in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundingEvent {
    /// RPC-assigned event id; unique across the chain.
    pub event_id: String,
    pub event_type: String,
    pub investor: Option<String>,
    /// i128 amounts are carried as decimal strings. For `initialized`
    /// this is the goal.
    pub amount: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
}

/// A raw event record as stored in / read from the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventRecord {
    pub id: i64,
    pub event_id: String,
    pub event_type: String,
    pub investor: Option<String>,
    pub amount: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
    pub created_at: i64,
}

/// Per-investor totals folded from stored events.
///
/// Amounts are decimal strings because they are `i128` on chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvestorSummary {
    pub investor: String,
    pub invested: String,
    pub refunded: String,
    /// `invested - refunded`; should equal the contract's `invest_of`.
    pub net_invested: String,
    pub claimed_reward: String,
    pub has_claimed: bool,
    pub event_count: usize,
}

impl InvestorSummary {
    /// Fold `events` (all belonging to `investor`) into running totals.
    pub fn from_events(investor: &str, events: &[EventRecord]) -> Result<Self> {
        let mut invested: i128 = 0;
        let mut refunded: i128 = 0;
        let mut claimed: i128 = 0;
        let mut has_claimed = false;

        for ev in events {
            match EventKind::from_stored(&ev.event_type) {
                EventKind::Invested => {
                    invested = checked(invested.checked_add(parse_amount(ev)?), ev)?;
                }
                EventKind::Refunded => {
                    refunded = checked(refunded.checked_add(parse_amount(ev)?), ev)?;
                }
                EventKind::RewardClaimed => {
                    claimed = checked(claimed.checked_add(parse_amount(ev)?), ev)?;
                    has_claimed = true;
                }
                EventKind::Initialized | EventKind::Unknown => {}
            }
        }

        let net_invested = invested.checked_sub(refunded).ok_or_else(|| {
            IndexerError::EventParse(format!("net investment overflow for {investor}"))
        })?;

        Ok(InvestorSummary {
            investor: investor.to_string(),
            invested: invested.to_string(),
            refunded: refunded.to_string(),
            net_invested: net_invested.to_string(),
            claimed_reward: claimed.to_string(),
            has_claimed,
            event_count: events.len(),
        })
    }
}

fn parse_amount(ev: &EventRecord) -> Result<i128> {
    let raw = ev.amount.as_deref().ok_or_else(|| {
        IndexerError::EventParse(format!("event {} has no amount", ev.event_id))
    })?;
    raw.parse::<i128>().map_err(|_| {
        IndexerError::EventParse(format!("event {} has invalid amount {raw:?}", ev.event_id))
    })
}

fn checked(sum: Option<i128>, ev: &EventRecord) -> Result<i128> {
    sum.ok_or_else(|| IndexerError::EventParse(format!("amount overflow at event {}", ev.event_id)))
}
