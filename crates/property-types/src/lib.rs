pub mod aggregate;
pub mod building;
pub mod lease;

pub use aggregate::{
    DashboardStats, DecadeBucket, LeaseStats, MapPoint, SquareFootageSlice, StateBucket,
};
pub use building::{Building, Ownership, OwnershipFilter, ParseOwnershipError};
pub use lease::{EnhancedBuilding, LeaseRecord, LeaseStatus, PrimaryLease, ProcessedLease};
