pub mod dates;
pub mod format;
pub mod query;
pub mod reconcile;
pub mod stats;

pub use dates::{parse_lease_date, ExpiryWindow};
pub use query::{map_points, sort_buildings, BuildingFilter, QueryError, SortKey, SortOrder};
pub use reconcile::{
    compare_primary, duration_years, lease_status, process_lease, reconcile, reconcile_building,
    select_primary,
};
pub use stats::{
    dashboard_stats, decade_buckets, lease_stats, square_footage_breakdown, state_distribution,
};
