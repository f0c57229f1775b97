//! CSV and plain-text rendering of an estimate.

use std::fmt::Write as _;

use jiff::Timestamp;

use crate::model::EstimateRequest;
use crate::optimizer::{Estimate, WeightCapOutcome};

/// Column names of the CSV export, in order.
pub const CSV_HEADER: &str = "date,container,item,orientation,layout,total_items,occupancy_percent,total_volume_m3,total_weight_kg,weight_cap";

/// Renders a single-row CSV report stamped with `generated_at`.
pub fn to_csv(request: &EstimateRequest, estimate: &Estimate, generated_at: Timestamp) -> String {
    let mut out = String::with_capacity(CSV_HEADER.len() * 2);
    out.push_str(CSV_HEADER);
    out.push('\n');
    // Writing into a String cannot fail.
    let _ = writeln!(
        out,
        "{},{},{},{},{},{},{:.2},{:.4},{:.2},{}",
        generated_at,
        request.container,
        request.item,
        estimate.orientation(),
        estimate.layout(),
        estimate.count,
        estimate.stats.occupancy_percent,
        estimate.stats.total_volume_m3,
        estimate.stats.total_weight_kg,
        estimate.weight_cap.code(),
    );
    out
}

/// Renders a CSV report stamped with the current time.
pub fn to_csv_now(request: &EstimateRequest, estimate: &Estimate) -> String {
    to_csv(request, estimate, Timestamp::now())
}

/// Renders a human readable summary.
pub fn to_text(request: &EstimateRequest, estimate: &Estimate) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Container:    {} cm", request.container);
    let _ = writeln!(out, "Item:         {} cm", request.item);
    if request.margin > 0.0 {
        let _ = writeln!(out, "Margin:       {} cm per side", request.margin);
    }
    let _ = writeln!(
        out,
        "Orientation:  {} cm{}",
        estimate.orientation(),
        if request.allow_rotation {
            " (rotation allowed)"
        } else {
            ""
        }
    );
    let _ = writeln!(out, "Layout:       {}", estimate.layout());
    let _ = writeln!(out, "Total items:  {}", estimate.count);
    match &estimate.weight_cap {
        WeightCapOutcome::Capped { from, to } => {
            let _ = writeln!(out, "Weight cap:   {} -> {} items", from, to);
        }
        WeightCapOutcome::Skipped { reason } => {
            let _ = writeln!(out, "Weight cap:   skipped ({})", reason);
        }
        WeightCapOutcome::NotRequested | WeightCapOutcome::WithinLimit => {}
    }
    let _ = writeln!(
        out,
        "Volume:       {:.3} / {:.3} m³",
        estimate.stats.total_volume_m3, estimate.stats.container_volume_m3
    );
    let _ = writeln!(out, "Occupancy:    {:.1}%", estimate.stats.occupancy_percent);
    if estimate.stats.total_weight_kg > 0.0 {
        let _ = writeln!(out, "Total weight: {:.1} kg", estimate.stats.total_weight_kg);
    }
    out
}
