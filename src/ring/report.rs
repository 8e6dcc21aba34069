//! Diagnostic report of the key space ranges owned by each node.

use std::collections::BTreeMap;

use crate::common::{NodeId, Position};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Range of positions attributed to a single virtual node.
///
/// A virtual node at `position[i]` is attributed `[position[i], position[i + 1] - 1]`,
/// the last one wraps around to `position[0] - 1`.
pub struct VirtualRange {
    pub owner: NodeId,
    /// First position of the range, the virtual node's own position.
    pub start: Position,
    /// Last position of the range (inclusive).
    pub end: Position,
    /// Number of positions in the range.
    pub width: u64,
}

impl VirtualRange {
    /// Returns `true` if this range crosses the top of the key space back to zero.
    pub fn wraps(&self) -> bool {
        self.end < self.start
    }

    pub fn contains(&self, position: Position) -> bool {
        if self.wraps() {
            position >= self.start || position <= self.end
        } else {
            position >= self.start && position <= self.end
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Ranges of every virtual node in ring order, and the width each physical node covers in total.
pub struct RangeReport {
    ranges: Vec<VirtualRange>,
    totals: BTreeMap<NodeId, u64>,
    keyspace: u64,
}

impl RangeReport {
    /// Build a report from virtual nodes sorted ascending by position.
    pub(crate) fn new<'a, I>(virtual_nodes: I, keyspace: u64) -> Self
    where
        I: IntoIterator<Item = (&'a Position, &'a NodeId)>,
    {
        let sorted: Vec<_> = virtual_nodes.into_iter().collect();

        let mut ranges = Vec::with_capacity(sorted.len());
        let mut totals: BTreeMap<NodeId, u64> = BTreeMap::new();

        if let Some((first, _)) = sorted.first() {
            let first = **first;

            for (i, (position, owner)) in sorted.iter().enumerate() {
                let start = **position;

                let (end, width) = match sorted.get(i + 1) {
                    Some((next, _)) => (
                        Position(next.0.wrapping_sub(1)),
                        start.distance(next, keyspace),
                    ),
                    None => {
                        let end = if first.0 == 0 {
                            Position(keyspace.saturating_sub(1) as u32)
                        } else {
                            Position(first.0 - 1)
                        };

                        (end, keyspace.saturating_sub(start.0 as u64) + first.0 as u64)
                    }
                };

                *totals.entry((*owner).clone()).or_default() += width;

                ranges.push(VirtualRange {
                    owner: (*owner).clone(),
                    start,
                    end,
                    width,
                });
            }
        }

        RangeReport {
            ranges,
            totals,
            keyspace,
        }
    }

    // === Getters ===

    /// Ranges of every virtual node, sorted by their start position.
    pub fn ranges(&self) -> &[VirtualRange] {
        &self.ranges
    }

    /// Total width covered by each physical node.
    pub fn totals(&self) -> &BTreeMap<NodeId, u64> {
        &self.totals
    }

    /// Size of the key space this report covers.
    pub fn keyspace(&self) -> u64 {
        self.keyspace
    }

    // === Public Methods ===

    /// Total width covered by `node`, zero for unknown nodes.
    pub fn coverage(&self, node: &str) -> u64 {
        self.totals.get(node).copied().unwrap_or(0)
    }

    /// Fraction of the key space covered by `node`.
    pub fn share(&self, node: &str) -> f64 {
        self.coverage(node) as f64 / self.keyspace as f64
    }

    /// Sum of all widths, equal to [Self::keyspace] for a non-empty ring.
    pub fn total(&self) -> u64 {
        self.totals.values().sum()
    }

    /// Range containing `position`, if any.
    pub fn range_of(&self, position: Position) -> Option<&VirtualRange> {
        if self.ranges.is_empty() {
            return None;
        }

        // Last range starting at or before `position`, or the wrapping one.
        let index = self.ranges.partition_point(|range| range.start <= position);

        Some(&self.ranges[index.checked_sub(1).unwrap_or(self.ranges.len() - 1)])
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::common::KEYSPACE;

    fn report(entries: &[(u32, &str)], keyspace: u64) -> RangeReport {
        let entries: BTreeMap<Position, NodeId> = entries
            .iter()
            .map(|(position, node)| (Position(*position), NodeId::from(*node)))
            .collect();

        RangeReport::new(&entries, keyspace)
    }

    #[test]
    fn empty() {
        let report = report(&[], KEYSPACE);

        assert!(report.is_empty());
        assert_eq!(report.total(), 0);
        assert_eq!(report.coverage("S1"), 0);
        assert_eq!(report.range_of(Position(5)), None);
    }

    #[test]
    fn single_virtual_node_covers_everything() {
        let report = report(&[(100, "S1")], KEYSPACE);

        assert_eq!(
            report.ranges(),
            &[VirtualRange {
                owner: "S1".into(),
                start: Position(100),
                end: Position(99),
                width: KEYSPACE,
            }]
        );
        assert_eq!(report.coverage("S1"), KEYSPACE);
        assert_eq!(report.share("S1"), 1.0);
    }

    #[test]
    fn single_virtual_node_at_zero() {
        let report = report(&[(0, "S1")], 1000);

        assert_eq!(report.ranges()[0].end, Position(999));
        assert!(!report.ranges()[0].wraps());
        assert_eq!(report.total(), 1000);
    }

    #[test]
    fn ranges_and_totals() {
        let report = report(&[(100, "S1"), (400, "S2"), (700, "S1")], 1000);

        let ranges: Vec<_> = report
            .ranges()
            .iter()
            .map(|r| (r.owner.to_string(), r.start.0, r.end.0, r.width))
            .collect();

        assert_eq!(
            ranges,
            vec![
                ("S1".to_string(), 100, 399, 300),
                ("S2".to_string(), 400, 699, 300),
                ("S1".to_string(), 700, 99, 400),
            ]
        );

        assert_eq!(report.coverage("S1"), 700);
        assert_eq!(report.coverage("S2"), 300);
        assert_eq!(report.total(), 1000);
        assert!(report.ranges()[2].wraps());
    }

    #[test]
    fn full_keyspace_ends() {
        let report = report(&[(0, "S1"), (u32::MAX, "S2")], KEYSPACE);

        assert_eq!(report.ranges()[0].end, Position(u32::MAX - 1));
        assert_eq!(report.ranges()[0].width, u32::MAX as u64);
        assert_eq!(report.ranges()[1].end, Position(u32::MAX));
        assert_eq!(report.ranges()[1].width, 1);
        assert_eq!(report.total(), KEYSPACE);
    }

    #[test]
    fn range_of() {
        let report = report(&[(100, "S1"), (400, "S2"), (700, "S3")], 1000);

        assert_eq!(report.range_of(Position(100)).unwrap().owner, "S1");
        assert_eq!(report.range_of(Position(399)).unwrap().owner, "S1");
        assert_eq!(report.range_of(Position(400)).unwrap().owner, "S2");
        assert_eq!(report.range_of(Position(999)).unwrap().owner, "S3");
        assert_eq!(report.range_of(Position(5)).unwrap().owner, "S3");

        for p in 0..1000 {
            let range = report.range_of(Position(p)).unwrap();
            assert!(range.contains(Position(p)));
        }
    }
}
