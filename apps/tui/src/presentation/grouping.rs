use crate::calculations::Totals;
use crate::domain::MarketingRecord;
use crate::pipeline::{ByAddress, Memo, View};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// All records of one region with their subtotals.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionGroup {
    pub region: String,
    pub records: Vec<MarketingRecord>,
    pub totals: Totals,
}

impl RegionGroup {
    pub fn ctr(&self) -> f64 {
        self.totals.ctr()
    }

    pub fn cpa(&self) -> f64 {
        self.totals.cpa()
    }
}

/// Groups by region in first-appearance order; records keep their order
/// inside each group.
pub fn group_by_region(data: &[MarketingRecord]) -> Vec<RegionGroup> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<RegionGroup> = Vec::new();

    for record in data {
        let index = *positions.entry(record.region.as_str()).or_insert_with(|| {
            groups.push(RegionGroup {
                region: record.region.clone(),
                records: Vec::new(),
                totals: Totals::default(),
            });
            groups.len() - 1
        });
        let group = &mut groups[index];
        group.totals.add(record);
        group.records.push(record.clone());
    }

    groups
}

/// One line of the flattened tree, addressed by indices into the groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlatRow {
    Region {
        group: usize,
        expanded: bool,
    },
    Channel {
        group: usize,
        record: usize,
        is_last: bool,
    },
}

pub fn flatten_groups(groups: &[RegionGroup], expanded: &BTreeSet<String>) -> Vec<FlatRow> {
    let mut rows = Vec::with_capacity(groups.len());
    for (group_index, group) in groups.iter().enumerate() {
        let is_expanded = expanded.contains(&group.region);
        rows.push(FlatRow::Region {
            group: group_index,
            expanded: is_expanded,
        });
        if is_expanded {
            let last = group.records.len().saturating_sub(1);
            rows.extend((0..group.records.len()).map(|record| FlatRow::Channel {
                group: group_index,
                record,
                is_last: record == last,
            }));
        }
    }
    rows
}

/// A resolved row, borrowing from the table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Row<'a> {
    Region {
        group: &'a RegionGroup,
        expanded: bool,
    },
    Channel {
        region: &'a str,
        record: &'a MarketingRecord,
        is_last: bool,
    },
}

/// Region -> channel tree over the filtered view, with an expanded-region
/// set and a memoized flat row list for virtualized rendering.
#[derive(Debug)]
pub struct GroupedTable {
    groups_memo: Memo<ByAddress<[MarketingRecord]>, Arc<[RegionGroup]>>,
    rows_memo: Memo<(ByAddress<[RegionGroup]>, u64), Arc<[FlatRow]>>,
    groups: Arc<[RegionGroup]>,
    rows: Arc<[FlatRow]>,
    expanded: BTreeSet<String>,
    revision: u64,
}

impl Default for GroupedTable {
    fn default() -> Self {
        Self {
            groups_memo: Memo::default(),
            rows_memo: Memo::default(),
            groups: Arc::from(Vec::new()),
            rows: Arc::from(Vec::new()),
            expanded: BTreeSet::new(),
            revision: 0,
        }
    }
}

impl GroupedTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds whatever depends on `filtered` having changed.
    pub fn update(&mut self, filtered: &View) {
        self.groups = self
            .groups_memo
            .get_or_compute(ByAddress::new(filtered), |view| {
                let groups: Arc<[RegionGroup]> = Arc::from(group_by_region(&view.0));
                tracing::trace!(regions = groups.len(), "region groups recomputed");
                groups
            });
        self.refresh_rows();
    }

    fn refresh_rows(&mut self) {
        let key = (ByAddress::new(&self.groups), self.revision);
        let expanded = &self.expanded;
        self.rows = self
            .rows_memo
            .get_or_compute(key, |(groups, _)| Arc::from(flatten_groups(&groups.0, expanded)));
    }

    fn expanded_changed(&mut self) {
        self.revision += 1;
        self.refresh_rows();
    }

    /// Flips `region` and returns whether it is now expanded.
    pub fn toggle(&mut self, region: &str) -> bool {
        let now_expanded = if self.expanded.remove(region) {
            false
        } else {
            self.expanded.insert(region.to_string());
            true
        };
        self.expanded_changed();
        now_expanded
    }

    pub fn expand_all(&mut self) {
        let regions: Vec<String> = self.groups.iter().map(|g| g.region.clone()).collect();
        self.expanded.extend(regions);
        self.expanded_changed();
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
        self.expanded_changed();
    }

    pub fn is_expanded(&self, region: &str) -> bool {
        self.expanded.contains(region)
    }

    pub fn groups(&self) -> &[RegionGroup] {
        &self.groups
    }

    pub fn rows(&self) -> &[FlatRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        match *self.rows.get(index)? {
            FlatRow::Region { group, expanded } => Some(Row::Region {
                group: self.groups.get(group)?,
                expanded,
            }),
            FlatRow::Channel {
                group,
                record,
                is_last,
            } => {
                let group = self.groups.get(group)?;
                Some(Row::Channel {
                    region: &group.region,
                    record: group.records.get(record)?,
                    is_last,
                })
            }
        }
    }

    /// Region the row at `index` belongs to.
    pub fn region_at(&self, index: usize) -> Option<&str> {
        match self.row(index)? {
            Row::Region { group, .. } => Some(&group.region),
            Row::Channel { region, .. } => Some(region),
        }
    }

    /// `(grouping, flattening)` recompute counts.
    pub fn computations(&self) -> (u64, u64) {
        (self.groups_memo.computations(), self.rows_memo.computations())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(id: u64, channel: &str, region: &str, spend: f64) -> MarketingRecord {
        MarketingRecord {
            id,
            channel: channel.to_string(),
            region: region.to_string(),
            spend,
            impressions: 200,
            clicks: 10,
            conversions: 2,
        }
    }

    fn view() -> View {
        Arc::from(vec![
            record(1, "Search", "EU", 10.0),
            record(2, "Social", "US", 20.0),
            record(3, "Email", "EU", 30.0),
            record(4, "Video", "APAC", 40.0),
        ])
    }

    #[test]
    fn groups_follow_first_appearance_with_subtotals() {
        let groups = group_by_region(&view());
        let regions: Vec<&str> = groups.iter().map(|g| g.region.as_str()).collect();
        assert_eq!(regions, vec!["EU", "US", "APAC"]);

        let eu = &groups[0];
        assert_eq!(eu.records.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 3]);
        assert!((eu.totals.spend - 40.0).abs() < f64::EPSILON);
        assert_eq!(eu.totals.count, 2);
        assert!((eu.ctr() - 5.0).abs() < f64::EPSILON);
        assert!((eu.cpa() - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn expanding_region_inserts_its_channel_rows() {
        let mut table = GroupedTable::new();
        table.update(&view());
        assert_eq!(table.len(), 3);

        assert!(table.toggle("EU"));
        assert_eq!(table.len(), 5);
        assert_eq!(
            table.rows()[..3],
            [
                FlatRow::Region { group: 0, expanded: true },
                FlatRow::Channel { group: 0, record: 0, is_last: false },
                FlatRow::Channel { group: 0, record: 1, is_last: true },
            ]
        );

        match table.row(2) {
            Some(Row::Channel { region, record, is_last }) => {
                assert_eq!(region, "EU");
                assert_eq!(record.id, 3);
                assert!(is_last);
            }
            other => panic!("unexpected row: {other:?}"),
        }
        assert_eq!(table.region_at(3), Some("US"));
        assert!(table.row(5).is_none());

        assert!(!table.toggle("EU"));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn expand_and_collapse_all() {
        let mut table = GroupedTable::new();
        table.update(&view());

        table.expand_all();
        assert_eq!(table.len(), 7);
        assert!(table.is_expanded("APAC"));

        table.collapse_all();
        assert_eq!(table.len(), 3);
        assert!(!table.is_expanded("EU"));
    }

    #[test]
    fn toggle_reflattens_without_regrouping() {
        let mut table = GroupedTable::new();
        let data = view();
        table.update(&data);
        assert_eq!(table.computations(), (1, 1));

        table.toggle("US");
        table.update(&data);
        assert_eq!(table.computations(), (1, 2));

        table.update(&Arc::from(data.to_vec()));
        assert_eq!(table.computations(), (2, 3));
        assert!(table.is_expanded("US"));
    }

    #[test]
    fn expanded_region_missing_from_view_is_kept() {
        let mut table = GroupedTable::new();
        table.update(&view());
        table.toggle("APAC");

        let without_apac: View = Arc::from(vec![record(1, "Search", "EU", 10.0)]);
        table.update(&without_apac);
        assert_eq!(table.len(), 1);

        table.update(&view());
        assert_eq!(table.len(), 4);
    }

    proptest! {
        #[test]
        fn row_count_matches_expanded_groups(
            regions in prop::collection::vec(0_usize..5, 0..40),
            mask in 0_u8..32,
        ) {
            let data: View = regions
                .iter()
                .enumerate()
                .map(|(id, region)| record(id as u64, "Search", &format!("R{region}"), 1.0))
                .collect::<Vec<_>>()
                .into();

            let mut table = GroupedTable::new();
            table.update(&data);
            for region in 0..5 {
                if mask & (1 << region) != 0 {
                    table.toggle(&format!("R{region}"));
                }
            }

            let expected = table.groups().len()
                + table
                    .groups()
                    .iter()
                    .filter(|g| table.is_expanded(&g.region))
                    .map(|g| g.records.len())
                    .sum::<usize>();
            prop_assert_eq!(table.len(), expected);

            for index in 0..table.len() {
                prop_assert!(table.row(index).is_some());
            }
            prop_assert!(table.row(table.len()).is_none());
        }
    }
}
