// Domain layer - Plain data types for the asset dashboard
pub mod asset;
pub mod chart;
pub mod page;
pub mod summary;
