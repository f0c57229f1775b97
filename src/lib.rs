//! Grid fit estimation of identical boxes in a pallet or shipping container.
//!
//! The estimator counts how many whole, axis-aligned copies of one item fit
//! along each container axis, optionally trying all six orientations, and
//! reports volume, occupancy and weight figures. An optional weight capacity
//! can lower the count.
//!
//! ```
//! use pallet_fit::model::{Constraints, EstimateRequest};
//! use pallet_fit::optimizer::estimate;
//! use pallet_fit::types::Dimensions;
//!
//! let request = EstimateRequest::new(
//!     Dimensions::new(120.0, 80.0, 150.0),
//!     Dimensions::new(30.0, 20.0, 15.0),
//! )
//! .with_constraints(Constraints::new(500.0, 5.0));
//!
//! let result = estimate(&request).unwrap();
//! assert_eq!(result.fit.count, 160);
//! assert_eq!(result.count, 100);
//! assert_eq!(result.stats.total_weight_kg, 500.0);
//! ```

pub mod api;
pub mod config;
pub mod model;
pub mod optimizer;
pub mod orientation;
pub mod report;
pub mod types;
