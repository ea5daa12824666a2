//! Access control for creation operations
//!
//! Consulted before anything that produces an artwork. Denials surface as
//! [`Error::PaymentRequired`] naming the cheapest tier that would allow the
//! action.

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Length of the usage window
const DAY: Duration = Duration::from_secs(86400);

/// Pricing tier of a caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// One artwork a day
    #[default]
    Free,
    /// Ten artworks a day
    Basic,
    /// A hundred artworks a day and collaboration
    Pro,
    /// No limits
    Enterprise,
}

impl Tier {
    /// Tiers from cheapest to most expensive
    pub const ALL: [Tier; 4] = [Tier::Free, Tier::Basic, Tier::Pro, Tier::Enterprise];

    /// Lowercase name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Basic => "basic",
            Self::Pro => "pro",
            Self::Enterprise => "enterprise",
        }
    }

    /// Price in USDC
    pub fn price(&self) -> &'static str {
        match self {
            Self::Free => "0",
            Self::Basic => "0.001",
            Self::Pro => "0.01",
            Self::Enterprise => "0.1",
        }
    }

    /// Artworks per day; `None` is unlimited
    pub fn daily_limit(&self) -> Option<u32> {
        match self {
            Self::Free => Some(1),
            Self::Basic => Some(10),
            Self::Pro => Some(100),
            Self::Enterprise => None,
        }
    }

    /// Whether collaborative sessions are included
    pub fn allows_collaboration(&self) -> bool {
        *self >= Self::Pro
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Tier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::invalid_input(format!("unknown tier: {}", s)))
    }
}

/// What the caller wants to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessAction {
    /// Create one artwork
    Create,
    /// Start a collaborative session
    Collaborate,
}

/// Context for an access check
#[derive(Debug, Clone)]
pub struct AccessContext {
    /// Caller id
    pub caller: String,
    /// Requested action
    pub action: AccessAction,
    /// Tier the caller has paid for
    pub tier: Tier,
}

impl AccessContext {
    /// Create a context
    pub fn new(caller: impl Into<String>, action: AccessAction, tier: Tier) -> Self {
        Self {
            caller: caller.into(),
            action,
            tier,
        }
    }
}

/// Decides whether a caller may perform an action
///
/// [`check`](AccessGate::check) runs before the action and has no side
/// effects; [`commit`](AccessGate::commit) runs only once the action has
/// succeeded, so failed requests cost nothing.
pub trait AccessGate: Send + Sync {
    /// Allow or deny
    fn check(&self, context: &AccessContext) -> Result<()>;

    /// Count a completed action against the caller's quota
    fn commit(&self, _context: &AccessContext) {}
}

/// Gate that allows everything
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenAccess;

impl AccessGate for OpenAccess {
    fn check(&self, _context: &AccessContext) -> Result<()> {
        Ok(())
    }
}

/// Caller usage tracking
struct Usage {
    /// Actions in the current window
    count: u32,
    /// Window start
    window_start: Instant,
}

impl Default for Usage {
    fn default() -> Self {
        Self {
            count: 0,
            window_start: Instant::now(),
        }
    }
}

/// Enforces tier quotas with a per-caller daily window
#[derive(Default)]
pub struct TierGate {
    usage: DashMap<String, Usage>,
}

impl TierGate {
    /// Create with no recorded usage
    pub fn new() -> Self {
        Self::default()
    }

    /// Actions used by `caller` in the current window
    fn used(&self, caller: &str) -> u32 {
        self.usage
            .get(caller)
            .filter(|u| u.window_start.elapsed() <= DAY)
            .map(|u| u.count)
            .unwrap_or(0)
    }

    /// Actions left today for `caller` on `tier`; `None` is unlimited
    pub fn remaining(&self, caller: &str, tier: Tier) -> Option<u32> {
        let limit = tier.daily_limit()?;
        Some(limit.saturating_sub(self.used(caller)))
    }

    fn upgrade_from(tier: Tier) -> Tier {
        Tier::ALL.into_iter().find(|t| *t > tier).unwrap_or(Tier::Enterprise)
    }
}

impl AccessGate for TierGate {
    fn check(&self, context: &AccessContext) -> Result<()> {
        // 1. Feature check
        if context.action == AccessAction::Collaborate && !context.tier.allows_collaboration() {
            let needed = Tier::Pro;
            return Err(Error::payment_required(needed.name(), needed.price()));
        }

        // 2. Daily quota
        let Some(limit) = context.tier.daily_limit() else {
            return Ok(());
        };
        if self.used(&context.caller) >= limit {
            let needed = Self::upgrade_from(context.tier);
            debug!(caller = %context.caller, tier = %context.tier, "Daily quota exhausted");
            return Err(Error::payment_required(needed.name(), needed.price()));
        }
        Ok(())
    }

    fn commit(&self, context: &AccessContext) {
        if context.tier.daily_limit().is_none() {
            return;
        }
        let mut usage = self.usage.entry(context.caller.clone()).or_default();
        if usage.window_start.elapsed() > DAY {
            usage.count = 0;
            usage.window_start = Instant::now();
        }
        usage.count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_tier_allows_one_per_day() {
        let gate = TierGate::new();
        let ctx = AccessContext::new("alice", AccessAction::Create, Tier::Free);

        assert!(gate.check(&ctx).is_ok());
        gate.commit(&ctx);
        match gate.check(&ctx) {
            Err(Error::PaymentRequired { tier, price }) => {
                assert_eq!(tier, "basic");
                assert_eq!(price, "0.001");
            }
            other => panic!("expected payment required, got {:?}", other),
        }
        assert_eq!(gate.remaining("alice", Tier::Free), Some(0));
        assert_eq!(gate.remaining("bob", Tier::Free), Some(1));
    }

    #[test]
    fn test_collaboration_needs_pro() {
        let gate = TierGate::new();
        let basic = AccessContext::new("alice", AccessAction::Collaborate, Tier::Basic);
        let err = gate.check(&basic).unwrap_err();
        assert_eq!(err.status_code(), 402);

        let pro = AccessContext::new("alice", AccessAction::Collaborate, Tier::Pro);
        assert!(gate.check(&pro).is_ok());
    }

    #[test]
    fn test_enterprise_is_unlimited() {
        let gate = TierGate::new();
        let ctx = AccessContext::new("corp", AccessAction::Create, Tier::Enterprise);
        for _ in 0..500 {
            assert!(gate.check(&ctx).is_ok());
            gate.commit(&ctx);
        }
        assert_eq!(gate.remaining("corp", Tier::Enterprise), None);
    }

    #[test]
    fn test_check_alone_uses_no_quota() {
        let gate = TierGate::new();
        let ctx = AccessContext::new("alice", AccessAction::Create, Tier::Free);
        for _ in 0..3 {
            assert!(gate.check(&ctx).is_ok());
        }
        assert_eq!(gate.remaining("alice", Tier::Free), Some(1));

        gate.commit(&ctx);
        assert_eq!(gate.remaining("alice", Tier::Free), Some(0));
        assert!(gate.check(&ctx).is_err());
    }

    #[test]
    fn test_tier_parse() {
        assert_eq!("PRO".parse::<Tier>().unwrap(), Tier::Pro);
        assert!("platinum".parse::<Tier>().is_err());
        assert!(OpenAccess.check(&AccessContext::new("x", AccessAction::Collaborate, Tier::Free)).is_ok());
    }
}
