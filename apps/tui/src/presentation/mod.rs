// Grouped, virtualized view of the filtered records: region rows with
// subtotals, expandable into one row per record.

pub mod grouping;
pub mod window;

pub use grouping::{flatten_groups, group_by_region, FlatRow, GroupedTable, RegionGroup, Row};
pub use window::{scroll_offset, visible_range, Viewport};
