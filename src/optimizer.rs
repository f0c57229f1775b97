//! Grid fit estimation for a repeated item.
//!
//! The estimator counts how many identical, axis-aligned items fit along each
//! container axis independently (floor division), multiplies the three counts
//! and keeps the best orientation. An optional weight capacity can then lower
//! the count; statistics are always reported for the orientation that won the
//! grid fit.

use std::fmt;

use log::{debug, warn};
use serde::Serialize;

use crate::model::{
    Constraints, EstimateRequest, ValidationError, validate_dimensions, validate_max_weight,
    validate_unit_weight,
};
use crate::orientation::enumerate_orientations;
use crate::types::Dimensions;

/// Configuration for the estimator defaults.
///
/// Request fields override these values per call.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EstimatorConfig {
    /// Whether the six axis-aligned orientations are tried when a request does not say
    pub allow_rotation: bool,
    /// Handling margin in cm on each side of length and width when a request does not say
    pub default_margin: f64,
}

impl EstimatorConfig {
    pub const DEFAULT_ALLOW_ROTATION: bool = true;
    pub const DEFAULT_MARGIN: f64 = 5.0;

    /// Creates a builder for custom configuration.
    pub fn builder() -> EstimatorConfigBuilder {
        EstimatorConfigBuilder::default()
    }

    /// Builds a request for the given geometry, filling unset options from this configuration.
    pub fn request(
        &self,
        container: Dimensions,
        item: Dimensions,
        allow_rotation: Option<bool>,
        margin: Option<f64>,
        constraints: Constraints,
    ) -> EstimateRequest {
        EstimateRequest::new(container, item)
            .with_rotation(allow_rotation.unwrap_or(self.allow_rotation))
            .with_margin(margin.unwrap_or(self.default_margin))
            .with_constraints(constraints)
    }
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            allow_rotation: Self::DEFAULT_ALLOW_ROTATION,
            default_margin: Self::DEFAULT_MARGIN,
        }
    }
}

/// Builder for EstimatorConfig.
#[derive(Clone, Debug, Default)]
pub struct EstimatorConfigBuilder {
    config: EstimatorConfig,
}

impl EstimatorConfigBuilder {
    /// Sets whether rotations are allowed by default.
    pub fn allow_rotation(mut self, allow: bool) -> Self {
        self.config.allow_rotation = allow;
        self
    }

    /// Sets the default handling margin.
    pub fn default_margin(mut self, margin: f64) -> Self {
        self.config.default_margin = margin;
        self
    }

    /// Creates the final configuration.
    pub fn build(self) -> EstimatorConfig {
        self.config
    }
}

/// Item counts along the container's X, Y and Z axes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(into = "(u64, u64, u64)")]
pub struct GridArrangement {
    pub x: u64,
    pub y: u64,
    pub z: u64,
}

impl GridArrangement {
    pub const fn new(x: u64, y: u64, z: u64) -> Self {
        Self { x, y, z }
    }

    /// Arrangement of a zero fit.
    pub const fn zero() -> Self {
        Self::new(0, 0, 0)
    }

    /// Counts how many `oriented` items fit along each axis of `container`.
    pub fn fit(container: &Dimensions, oriented: &Dimensions) -> Self {
        Self::new(
            axis_count(container.length, oriented.length),
            axis_count(container.width, oriented.width),
            axis_count(container.height, oriented.height),
        )
    }

    /// Total number of items in the arrangement.
    pub fn total(&self) -> u64 {
        self.x.saturating_mul(self.y).saturating_mul(self.z)
    }
}

impl From<GridArrangement> for (u64, u64, u64) {
    fn from(arrangement: GridArrangement) -> Self {
        (arrangement.x, arrangement.y, arrangement.z)
    }
}

/// Renders the layout label, e.g. `4 × 4 × 10`.
impl fmt::Display for GridArrangement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} × {} × {}", self.x, self.y, self.z)
    }
}

/// Whole items fitting along one axis.
fn axis_count(container_len: f64, item_len: f64) -> u64 {
    (container_len / item_len).floor() as u64
}

/// Best grid fit over all candidate orientations.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PackingResult {
    pub count: u64,
    pub orientation: Dimensions,
    pub arrangement: GridArrangement,
}

impl PackingResult {
    /// Indicates that the item fits in no tested orientation.
    pub fn is_zero_fit(&self) -> bool {
        self.count == 0
    }
}

/// Events emitted while orientations are evaluated, for live visualization.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum FitEvent {
    /// One candidate orientation was counted.
    OrientationEvaluated {
        index: usize,
        orientation: Dimensions,
        arrangement: GridArrangement,
        total: u64,
    },
    /// A candidate strictly exceeded the best count so far.
    BestImproved {
        index: usize,
        orientation: Dimensions,
        total: u64,
    },
    /// All candidates were evaluated.
    Finished { orientations: usize, best_count: u64 },
}

/// Finds the orientation that fits the most whole items into `container`.
///
/// # Parameters
/// * `container` - Space available for the grid
/// * `item` - The item as given
/// * `allow_rotation` - Whether all six axis-aligned orientations are tried
///
/// # Returns
/// The best `PackingResult`, or `InvalidDimension` if any extent is not positive
pub fn best_fit(
    container: &Dimensions,
    item: &Dimensions,
    allow_rotation: bool,
) -> Result<PackingResult, ValidationError> {
    best_fit_with_progress(container, item, allow_rotation, |_| {})
}

/// Grid fit with a callback for every evaluation step.
///
/// The best count is only replaced by a strictly greater one, so among equal
/// counts the earliest enumerated orientation wins. When nothing fits, the
/// first orientation is reported with a zero arrangement.
pub fn best_fit_with_progress(
    container: &Dimensions,
    item: &Dimensions,
    allow_rotation: bool,
    mut on_event: impl FnMut(&FitEvent),
) -> Result<PackingResult, ValidationError> {
    validate_dimensions(container, "Container")?;
    validate_dimensions(item, "Item")?;

    let orientations = enumerate_orientations(item, allow_rotation);
    let mut best = PackingResult {
        count: 0,
        orientation: orientations[0],
        arrangement: GridArrangement::zero(),
    };

    for (index, orientation) in orientations.iter().enumerate() {
        let arrangement = GridArrangement::fit(container, orientation);
        let total = arrangement.total();
        on_event(&FitEvent::OrientationEvaluated {
            index,
            orientation: *orientation,
            arrangement,
            total,
        });

        if total > best.count {
            best = PackingResult {
                count: total,
                orientation: *orientation,
                arrangement,
            };
            on_event(&FitEvent::BestImproved {
                index,
                orientation: *orientation,
                total,
            });
        }
    }

    debug!(
        "Grid fit of {} in {}: {} items as {} ({} orientations)",
        item,
        container,
        best.count,
        best.arrangement,
        orientations.len()
    );
    on_event(&FitEvent::Finished {
        orientations: orientations.len(),
        best_count: best.count,
    });
    Ok(best)
}

/// Volume, occupancy and weight figures of a count of oriented items.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Stats {
    pub container_volume_m3: f64,
    pub item_volume_m3: f64,
    pub total_volume_m3: f64,
    pub occupancy_percent: f64,
    pub total_weight_kg: f64,
}

/// Derives statistics for `count` items of `oriented_item` in `container`.
///
/// Volumes are converted from cm³ to m³. Occupancy is 0 for a container
/// without volume.
pub fn compute_stats(
    container: &Dimensions,
    oriented_item: &Dimensions,
    count: u64,
    unit_weight: f64,
) -> Stats {
    let container_volume_m3 = container.volume_m3();
    let item_volume_m3 = oriented_item.volume_m3();
    let total_volume_m3 = count as f64 * item_volume_m3;
    let occupancy_percent = if container_volume_m3 == 0.0 {
        0.0
    } else {
        total_volume_m3 / container_volume_m3 * 100.0
    };
    // inf / inf on huge extents; keep the reported figure numeric.
    let occupancy_percent = if occupancy_percent.is_finite() {
        occupancy_percent
    } else {
        0.0
    };

    Stats {
        container_volume_m3,
        item_volume_m3,
        total_volume_m3,
        occupancy_percent,
        total_weight_kg: count as f64 * unit_weight,
    }
}

/// Limits `count` to what `max_weight` can carry.
///
/// Returns `count` unchanged while `count * unit_weight <= max_weight`,
/// otherwise `min(count, floor(max_weight / unit_weight))`. A non-positive
/// unit weight or a negative capacity is an `InvalidWeight` error.
pub fn apply_weight_cap(
    count: u64,
    unit_weight: f64,
    max_weight: f64,
) -> Result<u64, ValidationError> {
    validate_unit_weight(unit_weight)?;
    validate_max_weight(max_weight)?;

    if count as f64 * unit_weight <= max_weight {
        return Ok(count);
    }
    let carried = (max_weight / unit_weight).floor() as u64;
    Ok(count.min(carried))
}

/// What the weight capacity did to the grid count.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WeightCapOutcome {
    /// No capacity was given.
    NotRequested,
    /// The grid count is within the capacity.
    WithinLimit,
    /// The count was lowered.
    Capped { from: u64, to: u64 },
    /// The cap could not be evaluated; the grid count is kept.
    Skipped { reason: String },
}

impl WeightCapOutcome {
    pub fn code(&self) -> &'static str {
        match self {
            WeightCapOutcome::NotRequested => "not_requested",
            WeightCapOutcome::WithinLimit => "within_limit",
            WeightCapOutcome::Capped { .. } => "capped",
            WeightCapOutcome::Skipped { .. } => "skipped",
        }
    }
}

/// Complete result of an estimation.
///
/// # Fields
/// * `fit` - Best grid fit before any weight cap
/// * `count` - Item count after the weight cap
/// * `weight_cap` - Effect of the weight capacity
/// * `stats` - Statistics for `count` items in the fitted orientation
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Estimate {
    pub fit: PackingResult,
    pub count: u64,
    pub weight_cap: WeightCapOutcome,
    pub stats: Stats,
}

impl Estimate {
    /// Layout label of the grid fit.
    pub fn layout(&self) -> String {
        self.fit.arrangement.to_string()
    }

    /// Orientation used for every reported figure.
    pub fn orientation(&self) -> Dimensions {
        self.fit.orientation
    }
}

/// Resolves the weight cap of `constraints` against a grid count.
fn resolve_weight_cap(count: u64, constraints: &Constraints) -> (u64, WeightCapOutcome) {
    let Some(max_weight) = constraints.max_weight else {
        return (count, WeightCapOutcome::NotRequested);
    };
    let Some(unit_weight) = constraints.unit_weight else {
        let reason = "Unit weight is required to apply a maximum weight".to_string();
        warn!("⚠️ Weight cap skipped: {}", reason);
        return (count, WeightCapOutcome::Skipped { reason });
    };

    match apply_weight_cap(count, unit_weight, max_weight) {
        Ok(capped) if capped < count => {
            debug!(
                "Weight cap {} kg at {} kg/item lowers {} to {}",
                max_weight, unit_weight, count, capped
            );
            (
                capped,
                WeightCapOutcome::Capped {
                    from: count,
                    to: capped,
                },
            )
        }
        Ok(_) => (count, WeightCapOutcome::WithinLimit),
        Err(err) => {
            warn!("⚠️ Weight cap skipped: {}", err);
            (
                count,
                WeightCapOutcome::Skipped {
                    reason: err.to_string(),
                },
            )
        }
    }
}

/// Runs a full estimation: validation, grid fit, weight cap and statistics.
///
/// The grid fit uses the container minus the handling margin; volumes and
/// occupancy refer to the full container.
pub fn estimate(request: &EstimateRequest) -> Result<Estimate, ValidationError> {
    estimate_with_progress(request, |_| {})
}

/// Full estimation with progress callback (suitable for SSE).
pub fn estimate_with_progress(
    request: &EstimateRequest,
    on_event: impl FnMut(&FitEvent),
) -> Result<Estimate, ValidationError> {
    request.validate()?;

    let fit = best_fit_with_progress(
        &request.usable_container(),
        &request.item,
        request.allow_rotation,
        on_event,
    )?;
    let (count, weight_cap) = resolve_weight_cap(fit.count, &request.constraints);
    let stats = compute_stats(
        &request.container,
        &fit.orientation,
        count,
        request.constraints.effective_unit_weight(),
    );

    Ok(Estimate {
        fit,
        count,
        weight_cap,
        stats,
    })
}
