//! The range/target reference-data store.
//!
//! Ranges and their targets live in a YAML catalog maintained alongside the tool. The engine
//! itself never touches files or raw text; this module parses a catalog document and resolves
//! one `(range, target)` pair into the [`Target`] record the engine consumes, converting the
//! catalog's aviation units (feet MSL) into engine units on the way.

use crate::geodesy::{Components, GeoPoint};
use crate::headings::{Declination, MagneticHeading};
use crate::profile::Target;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use uom::si::f64::{Angle, Length};
use uom::si::{angle::degree, length::foot};

/// Failure to parse the catalog or to resolve a name in it.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("no such range \"{name}\"")]
    UnknownRange { name: String },

    #[error("no such target \"{target}\" in range \"{range}\"")]
    UnknownTarget { range: String, target: String },

    #[error("malformed range catalog: {0}")]
    Parse(#[from] serde_yaml::Error),
}

#[derive(Debug, Deserialize)]
struct RangeRecord {
    name: String,
    /// Magnetic declination at the range, degrees east of true north.
    declination: f64,
    targets: Vec<TargetRecord>,
}

#[derive(Debug, Deserialize)]
struct TargetRecord {
    name: String,
    /// Decimal degrees; surveyed targets carry both, unsurveyed records neither.
    latitude: Option<f64>,
    longitude: Option<f64>,
    /// Feet above mean sea level.
    elevation: f64,
    /// The range's default attack heading for this target, degrees magnetic.
    attack_heading: f64,
}

/// A parsed range catalog.
#[derive(Debug)]
pub struct Catalog {
    ranges: Vec<RangeRecord>,
}

impl Catalog {
    /// Parses a catalog from its YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self, CatalogError> {
        Ok(Self {
            ranges: serde_yaml::from_str(yaml)?,
        })
    }

    /// Resolves a range/target name pair into the engine's [`Target`] record.
    ///
    /// A record without surveyed coordinates resolves to a `Target` without an anchor; the
    /// engine rejects it with a distinct configuration error rather than this lookup guessing
    /// a position.
    pub fn resolve(&self, range: &str, target: &str) -> Result<Target, CatalogError> {
        let range_record = self
            .ranges
            .iter()
            .find(|record| record.name == range)
            .ok_or_else(|| CatalogError::UnknownRange {
                name: range.to_owned(),
            })?;
        let record = range_record
            .targets
            .iter()
            .find(|record| record.name == target)
            .ok_or_else(|| CatalogError::UnknownTarget {
                range: range.to_owned(),
                target: target.to_owned(),
            })?;

        let anchor = match (record.latitude, record.longitude) {
            (Some(latitude), Some(longitude)) => GeoPoint::build(Components {
                latitude: Angle::new::<degree>(latitude),
                longitude: Angle::new::<degree>(longitude),
                altitude: Length::new::<foot>(record.elevation),
            }),
            _ => None,
        };
        debug!(range, target, anchored = anchor.is_some(), "resolved target record");

        Ok(Target {
            name: record.name.clone(),
            anchor,
            attack_heading: MagneticHeading::new(Angle::new::<degree>(record.attack_heading)),
            declination: Declination::new(Angle::new::<degree>(range_record.declination)),
        })
    }
}
