use crate::error::{ConfigurationError, ProfileError};
use crate::geodesy::GeoPoint;
use crate::headings::MagneticHeading;
use crate::profile::{ProfileParameters, Target};
use tracing::debug;
use uom::si::f64::{Angle, Length};
use uom::ConstZero;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Fraction of the base distance at which the track point sits, measured from the target.
///
/// No upstream parameter governs the track distance; this fixed ratio places the track point
/// between base and target, closer to the target than base.
pub const TRACK_DISTANCE_FRACTION: f64 = 0.5;

/// Fraction of the base distance at which the release point sits, measured from the target.
///
/// Keeps the release cone inside the base cone for any base distance.
pub const RELEASE_DISTANCE_FRACTION: f64 = 0.2;

/// The semantic role a waypoint plays in the attack run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum WaypointRole {
    Base,
    Track,
    Release,
    AimOff,
    AbortReference,
    MinimumReference,
}

impl WaypointRole {
    /// The stable display label for this role.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            WaypointRole::Base => "Base",
            WaypointRole::Track => "Track",
            WaypointRole::Release => "Release",
            WaypointRole::AimOff => "Aim-off",
            WaypointRole::AbortReference => "Abort Altitude",
            WaypointRole::MinimumReference => "Minimum Altitude",
        }
    }

    /// Whether this role is a pure altitude reference at the target rather than a point the
    /// attack run flies through.
    #[must_use]
    pub fn is_reference(&self) -> bool {
        matches!(
            self,
            WaypointRole::AbortReference | WaypointRole::MinimumReference
        )
    }
}

/// A single computed point of the attack profile, with the tolerances attached to it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Waypoint {
    pub role: WaypointRole,
    pub point: GeoPoint,
    /// Horizontal great-circle distance from the target anchor.
    pub distance_from_target: Length,
    /// ± angular tolerance on the attack heading at this waypoint, if any.
    pub heading_leeway: Option<Angle>,
    /// ± vertical tolerance on this waypoint's altitude, if any.
    pub altitude_leeway: Option<Length>,
}

/// The derived attack corridor: the effective heading and the ordered waypoint sequence.
///
/// Invariant: every flown waypoint's position lies on the geodesic ray leaving the target
/// anchor along the reciprocal of the effective attack heading (the aim-off point lies on the
/// perpendicular ray instead).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Corridor {
    anchor: GeoPoint,
    effective_heading: MagneticHeading,
    waypoints: Vec<Waypoint>,
}

impl Corridor {
    /// The target anchor the corridor is built around.
    #[must_use]
    pub fn anchor(&self) -> GeoPoint {
        self.anchor
    }

    /// The attack heading the profile is flown on, in the range's magnetic frame.
    #[must_use]
    pub fn effective_heading(&self) -> MagneticHeading {
        self.effective_heading
    }

    /// All waypoints in corridor order: base, track, release, aim-off, then the abort and
    /// minimum altitude references.
    #[must_use]
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Looks up the waypoint with the given role.
    #[must_use]
    pub fn waypoint(&self, role: WaypointRole) -> Option<&Waypoint> {
        self.waypoints.iter().find(|waypoint| waypoint.role == role)
    }
}

/// Computes the ordered waypoint sequence for one profile.
///
/// Fails with a [`ConfigurationError`] for a target without anchor coordinates or for
/// parameters that slipped past upstream validation, and with a
/// [`GeometryError`](crate::GeometryError) if a projection degenerates; in either case no
/// partial output is produced.
pub fn derive(target: &Target, params: &ProfileParameters) -> Result<Corridor, ProfileError> {
    params.validate()?;
    let anchor = target
        .anchor
        .ok_or_else(|| ConfigurationError::MissingAnchor {
            target: target.name.clone(),
        })?;

    let effective_heading = target.effective_attack_heading(params.attack_heading_override);
    // the inbound corridor extends from the base point towards the target, so waypoints are
    // projected outward along the opposite bearing
    let outbound = effective_heading.reciprocal();
    debug!(
        target = %target.name,
        %effective_heading,
        overridden = params.attack_heading_override.is_some(),
        "deriving attack corridor",
    );

    let track_distance = params.base_distance * TRACK_DISTANCE_FRACTION;
    let release_distance = params.base_distance * RELEASE_DISTANCE_FRACTION;

    let base = anchor.project(outbound.angle(), params.base_distance, params.base_altitude)?;
    let track = anchor.project(outbound.angle(), track_distance, params.track_altitude)?;
    let release = anchor.project(outbound.angle(), release_distance, params.release_altitude)?;

    // intended impact offset, perpendicular to the attack heading at ground level
    let aim_off = anchor.project(
        effective_heading.offset(Angle::HALF_TURN / 2.).angle(),
        params.aim_off_distance,
        anchor.altitude(),
    )?;

    let waypoints = vec![
        Waypoint {
            role: WaypointRole::Base,
            point: base,
            distance_from_target: params.base_distance,
            heading_leeway: Some(params.heading_leeway),
            altitude_leeway: Some(params.altitude_leeway),
        },
        Waypoint {
            role: WaypointRole::Track,
            point: track,
            distance_from_target: track_distance,
            heading_leeway: Some(params.heading_leeway),
            altitude_leeway: Some(params.altitude_leeway),
        },
        Waypoint {
            role: WaypointRole::Release,
            point: release,
            distance_from_target: release_distance,
            heading_leeway: Some(params.heading_leeway),
            altitude_leeway: Some(params.altitude_leeway),
        },
        Waypoint {
            role: WaypointRole::AimOff,
            point: aim_off,
            distance_from_target: params.aim_off_distance,
            heading_leeway: None,
            altitude_leeway: None,
        },
        Waypoint {
            role: WaypointRole::AbortReference,
            point: anchor.with_altitude(params.abort_altitude),
            distance_from_target: Length::ZERO,
            heading_leeway: None,
            altitude_leeway: Some(params.altitude_leeway),
        },
        Waypoint {
            role: WaypointRole::MinimumReference,
            point: anchor.with_altitude(params.minimum_altitude),
            distance_from_target: Length::ZERO,
            heading_leeway: None,
            altitude_leeway: Some(params.altitude_leeway),
        },
    ];
    debug!(waypoints = waypoints.len(), "derived attack corridor");

    Ok(Corridor {
        anchor,
        effective_heading,
        waypoints,
    })
}
