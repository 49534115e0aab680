//! Point and curve parameter sensitivities.
//!
//! Pricers express risk as [`PointSensitivity`] values, each the derivative of
//! a price with respect to one market quantity at one date. A pricing
//! environment then maps those points onto the parameters of its curves,
//! giving a [`CurveParameterSensitivity`].

use crate::core::currency::CurrencyCode;
use crate::core::index::{FxIndex, IborIndex, OvernightIndex};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sensitivity to a single market point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PointSensitivity {
    /// To the zero rate of the `currency` discount curve at `date`.
    ZeroRate {
        currency: CurrencyCode,
        date: NaiveDate,
        sensitivity: f64,
    },
    /// To the forward rate of an ibor index fixing on `fixing_date`.
    IborRate {
        index: IborIndex,
        fixing_date: NaiveDate,
        currency: CurrencyCode,
        sensitivity: f64,
    },
    /// To the forward rate of an overnight index from `fixing_date` to `end_date`.
    OvernightRate {
        index: OvernightIndex,
        fixing_date: NaiveDate,
        end_date: NaiveDate,
        currency: CurrencyCode,
        sensitivity: f64,
    },
    /// To the forward FX rate of an index fixing on `fixing_date`.
    FxIndexRate {
        index: FxIndex,
        reference_currency: CurrencyCode,
        fixing_date: NaiveDate,
        sensitivity: f64,
    },
}

impl PointSensitivity {
    pub fn sensitivity(&self) -> f64 {
        match self {
            PointSensitivity::ZeroRate { sensitivity, .. }
            | PointSensitivity::IborRate { sensitivity, .. }
            | PointSensitivity::OvernightRate { sensitivity, .. }
            | PointSensitivity::FxIndexRate { sensitivity, .. } => *sensitivity,
        }
    }

    pub fn with_sensitivity(&self, value: f64) -> Self {
        let mut point = self.clone();
        match &mut point {
            PointSensitivity::ZeroRate { sensitivity, .. }
            | PointSensitivity::IborRate { sensitivity, .. }
            | PointSensitivity::OvernightRate { sensitivity, .. }
            | PointSensitivity::FxIndexRate { sensitivity, .. } => *sensitivity = value,
        }
        point
    }

    /// Whether both refer to the same market point, ignoring the value.
    pub fn same_point(&self, other: &PointSensitivity) -> bool {
        self.with_sensitivity(0.0) == other.with_sensitivity(0.0)
    }
}

/// Accumulates point sensitivities before they are built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointSensitivityBuilder {
    points: Vec<PointSensitivity>,
}

impl PointSensitivityBuilder {
    /// No sensitivity at all.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn of(point: PointSensitivity) -> Self {
        Self {
            points: vec![point],
        }
    }

    pub fn multiplied_by(mut self, factor: f64) -> Self {
        for point in &mut self.points {
            *point = point.with_sensitivity(point.sensitivity() * factor);
        }
        self
    }

    pub fn combined_with(mut self, other: PointSensitivityBuilder) -> Self {
        self.points.extend(other.points);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn build(self) -> PointSensitivities {
        PointSensitivities {
            points: self.points,
        }
    }
}

/// A built list of point sensitivities.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointSensitivities {
    points: Vec<PointSensitivity>,
}

impl PointSensitivities {
    pub fn new(points: Vec<PointSensitivity>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[PointSensitivity] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Merge entries that refer to the same point, summing their values.
    /// First occurrence order is kept.
    pub fn normalized(&self) -> Self {
        let mut merged: Vec<PointSensitivity> = Vec::with_capacity(self.points.len());
        for point in &self.points {
            match merged.iter_mut().find(|m| m.same_point(point)) {
                Some(existing) => {
                    *existing = existing.with_sensitivity(existing.sensitivity() + point.sensitivity())
                }
                None => merged.push(point.clone()),
            }
        }
        Self { points: merged }
    }
}

/// Identifies one curve of a pricing environment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CurveName {
    pub name: String,
    pub currency: CurrencyCode,
}

impl CurveName {
    pub fn new(name: impl Into<String>, currency: CurrencyCode) -> Self {
        Self {
            name: name.into(),
            currency,
        }
    }
}

/// Sensitivity to the parameters of each curve, one value per parameter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurveParameterSensitivity {
    sensitivities: BTreeMap<CurveName, Vec<f64>>,
}

impl CurveParameterSensitivity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `values` to the curve's parameters, element by element.
    pub fn add(&mut self, curve: CurveName, values: &[f64]) {
        let entry = self.sensitivities.entry(curve).or_default();
        if entry.len() < values.len() {
            entry.resize(values.len(), 0.0);
        }
        for (total, value) in entry.iter_mut().zip(values) {
            *total += value;
        }
    }

    pub fn get(&self, curve: &CurveName) -> Option<&[f64]> {
        self.sensitivities.get(curve).map(Vec::as_slice)
    }

    pub fn combined_with(mut self, other: &CurveParameterSensitivity) -> Self {
        for (curve, values) in &other.sensitivities {
            self.add(curve.clone(), values);
        }
        self
    }

    pub fn curves(&self) -> impl Iterator<Item = &CurveName> {
        self.sensitivities.keys()
    }

    /// Sum over every parameter of every curve.
    pub fn total(&self) -> f64 {
        self.sensitivities.values().flatten().sum()
    }

    pub fn len(&self) -> usize {
        self.sensitivities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sensitivities.is_empty()
    }
}
