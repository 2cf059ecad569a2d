//! HL id allocation.

use edi837_model::{HierarchyLevel, HierarchyNode};
use edi837_x12::Segment;

/// Hands out sequential HL ids for one transaction.
#[derive(Debug, Default)]
pub struct HierarchyAllocator {
    last_id: u32,
}

impl HierarchyAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(
        &mut self,
        level: HierarchyLevel,
        parent: Option<u32>,
        has_children: bool,
    ) -> HierarchyNode {
        self.last_id += 1;
        HierarchyNode {
            id: self.last_id,
            parent,
            level,
            has_children,
        }
    }

    /// The shared 2000A node.
    pub fn billing_provider(&mut self, has_claims: bool) -> HierarchyNode {
        self.push(HierarchyLevel::BillingProvider, None, has_claims)
    }

    /// A 2000B node. Always followed by its patient.
    pub fn subscriber(&mut self, billing_provider: &HierarchyNode) -> HierarchyNode {
        self.push(HierarchyLevel::Subscriber, Some(billing_provider.id), true)
    }

    /// A 2000C leaf.
    pub fn patient(&mut self, subscriber: &HierarchyNode) -> HierarchyNode {
        self.push(HierarchyLevel::Patient, Some(subscriber.id), false)
    }

    pub fn allocated(&self) -> u32 {
        self.last_id
    }
}

/// `HL*id*parent*level*child`.
pub fn hl_segment(node: &HierarchyNode) -> Segment {
    Segment::new("HL")
        .text(node.id.to_string())
        .text(node.parent.map(|p| p.to_string()).unwrap_or_default())
        .text(node.level.code())
        .text(node.child_code())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_sequential_across_claims() {
        let mut hl = HierarchyAllocator::new();
        let provider = hl.billing_provider(true);
        let mut rendered = vec![hl_segment(&provider).to_string()];
        for _ in 0..2 {
            let subscriber = hl.subscriber(&provider);
            let patient = hl.patient(&subscriber);
            rendered.push(hl_segment(&subscriber).to_string());
            rendered.push(hl_segment(&patient).to_string());
        }
        assert_eq!(
            rendered,
            [
                "HL*1**20*1",
                "HL*2*1*22*1",
                "HL*3*2*23*0",
                "HL*4*1*22*1",
                "HL*5*4*23*0",
            ]
        );
        assert_eq!(hl.allocated(), 5);
    }
}
