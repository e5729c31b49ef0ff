//! Voting key model.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// An access key members sign in with.
///
/// Keys are provisioned outside the board. The only mutation they see is a
/// vote being spent, which lowers `balance` by one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VotingKey {
    /// Store-assigned identifier
    #[serde(rename = "_id")]
    pub id: String,

    /// Access code typed at sign-in
    #[serde(rename = "key")]
    pub code: String,

    /// Holder label (a role or client name)
    #[serde(rename = "client")]
    pub owner: String,

    /// Most votes this key can ever hold
    pub quota: u32,

    /// Votes left to spend
    #[serde(rename = "votes")]
    pub balance: u32,
}

impl VotingKey {
    /// Owner label that may record story-point estimates.
    pub const ADMIN_OWNER: &'static str = "admin";

    /// Create a key, rejecting a balance above the quota.
    pub fn new(id: String, code: String, owner: String, quota: u32, balance: u32) -> Result<Self> {
        let key = Self {
            id,
            code,
            owner,
            quota,
            balance,
        };
        key.check_invariant()?;
        Ok(key)
    }

    /// Create a key with its full quota available.
    pub fn with_full_quota(id: String, code: String, owner: String, quota: u32) -> Self {
        Self {
            id,
            code,
            owner,
            quota,
            balance: quota,
        }
    }

    /// Verify `balance <= quota`.
    pub fn check_invariant(&self) -> Result<()> {
        if self.balance > self.quota {
            return Err(Error::InvariantViolation(format!(
                "key {} balance {} exceeds quota {}",
                self.id, self.balance, self.quota
            )));
        }
        Ok(())
    }

    pub fn has_votes(&self) -> bool {
        self.balance > 0
    }

    /// Votes already spent.
    pub fn spent(&self) -> u32 {
        self.quota.saturating_sub(self.balance)
    }

    pub fn is_admin(&self) -> bool {
        self.owner == Self::ADMIN_OWNER
    }
}
