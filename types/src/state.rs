//! Classification and state enums for validator nodes and transactions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AegisError;

/// The specialization of a validator node. Determines which transaction
/// types it is eligible to decide.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidatorType {
    Consensus,
    Security,
    Verification,
    Audit,
}

impl ValidatorType {
    pub const ALL: [ValidatorType; 4] = [
        Self::Consensus,
        Self::Security,
        Self::Verification,
        Self::Audit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Consensus => "consensus",
            Self::Security => "security",
            Self::Verification => "verification",
            Self::Audit => "audit",
        }
    }
}

impl FromStr for ValidatorType {
    type Err = AegisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| AegisError::UnknownValidatorType(s.to_string()))
    }
}

/// Health status of a validator node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    Active,
    Inactive,
    Syncing,
    Maintenance,
}

impl NodeStatus {
    /// Only active nodes vote or propose blocks.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Syncing => "syncing",
            Self::Maintenance => "maintenance",
        }
    }
}

impl FromStr for NodeStatus {
    type Err = AegisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "syncing" => Ok(Self::Syncing),
            "maintenance" => Ok(Self::Maintenance),
            other => Err(AegisError::UnknownNodeStatus(other.to_string())),
        }
    }
}

/// Kind of security event carried by a transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    ThreatDetection,
    VulnerabilityScan,
    AccessControl,
    DataIntegrity,
    AuditLog,
}

impl TransactionType {
    pub const ALL: [TransactionType; 5] = [
        Self::ThreatDetection,
        Self::VulnerabilityScan,
        Self::AccessControl,
        Self::DataIntegrity,
        Self::AuditLog,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ThreatDetection => "threat_detection",
            Self::VulnerabilityScan => "vulnerability_scan",
            Self::AccessControl => "access_control",
            Self::DataIntegrity => "data_integrity",
            Self::AuditLog => "audit_log",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = AegisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| AegisError::UnknownTransactionType(s.to_string()))
    }
}

/// Submission priority. `Critical` transactions bypass the tick and trigger
/// an immediate consensus cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl FromStr for Priority {
    type Err = AegisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "critical" => Ok(Self::Critical),
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            other => Err(AegisError::UnknownPriority(other.to_string())),
        }
    }
}

/// Lifecycle state of a transaction. Forward-only:
/// `Pending -> Validated` or `Pending -> Rejected`, both terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Validated,
    Rejected,
}

impl TransactionStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Whether moving from `self` to `next` respects the forward-only lifecycle.
    pub fn can_transition_to(&self, next: TransactionStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Validated) | (Self::Pending, Self::Rejected)
        )
    }
}

/// Threat label derived from a transaction's priority and consensus confidence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ThreatLevel {
    High,
    Medium,
    Low,
    Minimal,
    /// The decision is not known (e.g. the wait window elapsed first).
    Unknown,
}

impl ThreatLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
            Self::Minimal => "MINIMAL",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for ThreatLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
