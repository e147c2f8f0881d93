//! The closed set of cacheable resource kinds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix every durable cache key carries.
pub const CACHE_KEY_PREFIX: &str = "cache_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Companies,
    Years,
    Students,
    AllStudents,
    AllCompanies,
    Rounds,
    Dashboard,
}

/// Whether a durable-store hit also kicks off a background refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevalidationPolicy {
    pub revalidate_on_durable_hit: bool,
}

impl RevalidationPolicy {
    const REVALIDATE: Self = Self {
        revalidate_on_durable_hit: true,
    };
    const EXPLICIT_ONLY: Self = Self {
        revalidate_on_durable_hit: false,
    };
}

/// Per-kind revalidation table. Small, volatile data is refreshed behind a
/// durable hit; the large list resources wait for explicit invalidation.
const POLICIES: [(ResourceKind, RevalidationPolicy); 7] = [
    (ResourceKind::Companies, RevalidationPolicy::EXPLICIT_ONLY),
    (ResourceKind::Years, RevalidationPolicy::REVALIDATE),
    (ResourceKind::Students, RevalidationPolicy::EXPLICIT_ONLY),
    (ResourceKind::AllStudents, RevalidationPolicy::EXPLICIT_ONLY),
    (ResourceKind::AllCompanies, RevalidationPolicy::EXPLICIT_ONLY),
    (ResourceKind::Rounds, RevalidationPolicy::EXPLICIT_ONLY),
    (ResourceKind::Dashboard, RevalidationPolicy::REVALIDATE),
];

impl ResourceKind {
    pub const ALL: [ResourceKind; 7] = [
        ResourceKind::Companies,
        ResourceKind::Years,
        ResourceKind::Students,
        ResourceKind::AllStudents,
        ResourceKind::AllCompanies,
        ResourceKind::Rounds,
        ResourceKind::Dashboard,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ResourceKind::Companies => "companies",
            ResourceKind::Years => "years",
            ResourceKind::Students => "students",
            ResourceKind::AllStudents => "all_students",
            ResourceKind::AllCompanies => "all_companies",
            ResourceKind::Rounds => "rounds",
            ResourceKind::Dashboard => "dashboard",
        }
    }

    /// Durable-store key for this kind, e.g. `cache_companies`.
    pub fn storage_key(&self) -> String {
        format!("{}{}", CACHE_KEY_PREFIX, self.name())
    }

    pub fn policy(&self) -> RevalidationPolicy {
        POLICIES
            .iter()
            .find(|(kind, _)| kind == self)
            .map(|(_, policy)| *policy)
            .unwrap_or(RevalidationPolicy::EXPLICIT_ONLY)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown resource kind: {0}")]
pub struct UnknownKind(pub String);

impl FromStr for ResourceKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

/// What an invalidation applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidateTarget {
    Kind(ResourceKind),
    All,
}

impl InvalidateTarget {
    pub fn kinds(&self) -> Vec<ResourceKind> {
        match self {
            InvalidateTarget::Kind(kind) => vec![*kind],
            InvalidateTarget::All => ResourceKind::ALL.to_vec(),
        }
    }
}

impl From<ResourceKind> for InvalidateTarget {
    fn from(kind: ResourceKind) -> Self {
        InvalidateTarget::Kind(kind)
    }
}

impl FromStr for InvalidateTarget {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            Ok(InvalidateTarget::All)
        } else {
            s.parse().map(InvalidateTarget::Kind)
        }
    }
}
