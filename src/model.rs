//! Input models for the grid fit estimation.
//!
//! This module defines the request side of an estimation:
//! - `Constraints`: optional weight capacity of the container and weight per item
//! - `EstimateRequest`: container, item, rotation switch, margin and constraints
//! - `ValidationError`: typed failures raised before any computation starts

use thiserror::Error;

use crate::types::Dimensions;

/// Largest handling margin accepted per side, in cm.
pub const MAX_MARGIN: f64 = 20.0;

/// Validation error for request data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Invalid dimension: {0}")]
    InvalidDimension(String),
    #[error("Invalid weight: {0}")]
    InvalidWeight(String),
    #[error("Invalid margin: {0}")]
    InvalidMargin(String),
}

/// Helper function to validate a single dimension.
fn validate_dimension(value: f64, name: &str) -> Result<(), ValidationError> {
    if value <= 0.0 || value.is_nan() || value.is_infinite() {
        return Err(ValidationError::InvalidDimension(format!(
            "{} must be positive, got: {}",
            name, value
        )));
    }
    Ok(())
}

/// Validates all three components of a triple, naming the owner in the message.
pub fn validate_dimensions(dims: &Dimensions, owner: &str) -> Result<(), ValidationError> {
    validate_dimension(dims.length, &format!("{} length", owner))?;
    validate_dimension(dims.width, &format!("{} width", owner))?;
    validate_dimension(dims.height, &format!("{} height", owner))?;
    Ok(())
}

/// Validates a per-item weight. Zero is rejected since it would make the cap ratio undefined.
pub fn validate_unit_weight(value: f64) -> Result<(), ValidationError> {
    if value <= 0.0 || value.is_nan() || value.is_infinite() {
        return Err(ValidationError::InvalidWeight(format!(
            "Unit weight must be positive, got: {}",
            value
        )));
    }
    Ok(())
}

/// Validates a weight capacity. Zero is a legal (if useless) capacity.
pub fn validate_max_weight(value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::InvalidWeight(format!(
            "Maximum weight must be a finite number, got: {}",
            value
        )));
    }
    if value < 0.0 {
        return Err(ValidationError::InvalidWeight(format!(
            "Maximum weight must not be negative, got: {}",
            value
        )));
    }
    Ok(())
}

/// Validates the handling margin against the container footprint.
///
/// The margin is reserved on both sides of the length and width axes, so
/// it has to leave a positive extent on each of them.
pub fn validate_margin(margin: f64, container: &Dimensions) -> Result<(), ValidationError> {
    if margin.is_nan() || !(0.0..=MAX_MARGIN).contains(&margin) {
        return Err(ValidationError::InvalidMargin(format!(
            "Margin must be between 0 and {}, got: {}",
            MAX_MARGIN, margin
        )));
    }
    let usable = container.shrink_footprint(margin);
    if usable.length <= 0.0 || usable.width <= 0.0 {
        return Err(ValidationError::InvalidMargin(format!(
            "Margin {} leaves no usable footprint in container {}",
            margin, container
        )));
    }
    Ok(())
}

/// Optional weight limits of an estimation.
///
/// # Fields
/// * `max_weight` - Weight capacity of the container in kg
/// * `unit_weight` - Weight of a single item in kg
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Constraints {
    pub max_weight: Option<f64>,
    pub unit_weight: Option<f64>,
}

impl Constraints {
    /// Creates constraints with both limits set.
    pub fn new(max_weight: f64, unit_weight: f64) -> Self {
        Self {
            max_weight: Some(max_weight),
            unit_weight: Some(unit_weight),
        }
    }

    /// Returns the unit weight usable for weight statistics.
    ///
    /// Missing or invalid weights count as 0 kg per item.
    pub fn effective_unit_weight(&self) -> f64 {
        match self.unit_weight {
            Some(weight) if validate_unit_weight(weight).is_ok() => weight,
            _ => 0.0,
        }
    }
}

/// A complete estimation request.
///
/// # Fields
/// * `container` - Interior dimensions of the pallet or container in cm
/// * `item` - Dimensions of the repeated item in cm
/// * `allow_rotation` - Whether all six axis-aligned orientations may be tried
/// * `margin` - Handling margin in cm reserved on each side of length and width
/// * `constraints` - Optional weight limits
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EstimateRequest {
    pub container: Dimensions,
    pub item: Dimensions,
    pub allow_rotation: bool,
    pub margin: f64,
    pub constraints: Constraints,
}

impl EstimateRequest {
    /// Creates a request with rotation enabled, no margin and no weight limits.
    pub fn new(container: Dimensions, item: Dimensions) -> Self {
        Self {
            container,
            item,
            allow_rotation: true,
            margin: 0.0,
            constraints: Constraints::default(),
        }
    }

    /// Sets whether the item may be rotated.
    pub fn with_rotation(mut self, allow_rotation: bool) -> Self {
        self.allow_rotation = allow_rotation;
        self
    }

    /// Sets the handling margin.
    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    /// Sets the weight limits.
    pub fn with_constraints(mut self, constraints: Constraints) -> Self {
        self.constraints = constraints;
        self
    }

    /// Validates geometry and margin. Weight limits are checked when the cap is applied.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_dimensions(&self.container, "Container")?;
        validate_dimensions(&self.item, "Item")?;
        validate_margin(self.margin, &self.container)?;
        Ok(())
    }

    /// Container space available for grid fitting once the margin is reserved.
    pub fn usable_container(&self) -> Dimensions {
        self.container.shrink_footprint(self.margin)
    }
}
