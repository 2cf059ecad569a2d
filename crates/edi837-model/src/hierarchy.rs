//! HL hierarchy nodes.

use serde::{Deserialize, Serialize};

/// HL03 hierarchical level code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HierarchyLevel {
    BillingProvider,
    Subscriber,
    Patient,
}

impl HierarchyLevel {
    pub fn code(self) -> &'static str {
        match self {
            Self::BillingProvider => "20",
            Self::Subscriber => "22",
            Self::Patient => "23",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "20" => Some(Self::BillingProvider),
            "22" => Some(Self::Subscriber),
            "23" => Some(Self::Patient),
            _ => None,
        }
    }

    /// Level code a node's parent must carry, `None` for the root level.
    pub fn parent_level(self) -> Option<Self> {
        match self {
            Self::BillingProvider => None,
            Self::Subscriber => Some(Self::BillingProvider),
            Self::Patient => Some(Self::Subscriber),
        }
    }
}

/// One HL segment.
///
/// Ids are 1-based and allocated sequentially within a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyNode {
    pub id: u32,
    pub parent: Option<u32>,
    pub level: HierarchyLevel,
    pub has_children: bool,
}

impl HierarchyNode {
    /// HL04 child code.
    pub fn child_code(&self) -> &'static str {
        if self.has_children { "1" } else { "0" }
    }
}
