use crate::error::ProfileError;
use crate::geodesy::GeoPoint;
use crate::profile::ProfileParameters;
use crate::waypoints::{Corridor, WaypointRole};
use tracing::debug;
use uom::si::f64::Length;
use uom::si::length::meter;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Radius of the abort/minimum reference planes rendered in declutter mode, in meters (2 NM).
pub(crate) const PLANE_RADIUS_M: f64 = 3_704.0;

/// The geometric tolerance region attached to a waypoint.
///
/// The declutter choice is made once, here, when the region is built: abort/minimum
/// references become either a `Band` or a `Plane`, and downstream rendering never needs a
/// declutter conditional again.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ToleranceRegion {
    /// Heading-leeway wedge: two rays from the target anchor extended to the waypoint's
    /// distance, bounding the acceptable attack headings.
    Cone {
        apex: GeoPoint,
        left: GeoPoint,
        right: GeoPoint,
        radius: Length,
    },
    /// Altitude-leeway interval at a fixed horizontal position.
    Band {
        at: GeoPoint,
        floor: Length,
        ceiling: Length,
    },
    /// Horizontal reference plane spanning a fixed radius around the target.
    Plane { center: GeoPoint, radius: Length },
}

/// A tolerance region tagged with the waypoint role it belongs to.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Envelope {
    pub role: WaypointRole,
    pub region: ToleranceRegion,
}

impl Envelope {
    /// The stable display label for this envelope, derived from its role and kind.
    #[must_use]
    pub fn label(&self) -> String {
        match &self.region {
            ToleranceRegion::Cone { .. } => format!("{} Heading Leeway", self.role.label()),
            // the reference roles are already named for their altitude
            ToleranceRegion::Band { .. } if self.role.is_reference() => {
                self.role.label().to_owned()
            }
            ToleranceRegion::Band { .. } => format!("{} Altitude Leeway", self.role.label()),
            ToleranceRegion::Plane { .. } => self.role.label().to_owned(),
        }
    }
}

/// Builds the tolerance envelopes for every waypoint of the corridor.
///
/// Base, track, and release each get a heading cone and an altitude band; abort and minimum
/// references get a band, or a reference plane when `declutter` is requested. The aim-off
/// point carries no tolerance. Toggling `declutter` changes only the abort/minimum
/// representation, never any waypoint coordinate or altitude.
pub fn build(
    corridor: &Corridor,
    params: &ProfileParameters,
) -> Result<Vec<Envelope>, ProfileError> {
    let outbound = corridor.effective_heading().reciprocal();
    let anchor = corridor.anchor();

    let mut envelopes = Vec::new();
    for waypoint in corridor.waypoints() {
        let altitude = waypoint.point.altitude();

        if let Some(leeway) = waypoint.heading_leeway {
            let left = anchor.project(
                outbound.offset(-leeway).angle(),
                waypoint.distance_from_target,
                altitude,
            )?;
            let right = anchor.project(
                outbound.offset(leeway).angle(),
                waypoint.distance_from_target,
                altitude,
            )?;
            envelopes.push(Envelope {
                role: waypoint.role,
                region: ToleranceRegion::Cone {
                    apex: anchor.with_altitude(altitude),
                    left,
                    right,
                    radius: waypoint.distance_from_target,
                },
            });
        }

        if let Some(leeway) = waypoint.altitude_leeway {
            let region = if waypoint.role.is_reference() && params.declutter {
                ToleranceRegion::Plane {
                    center: waypoint.point,
                    radius: Length::new::<meter>(PLANE_RADIUS_M),
                }
            } else {
                ToleranceRegion::Band {
                    at: waypoint.point,
                    floor: altitude - leeway,
                    ceiling: altitude + leeway,
                }
            };
            envelopes.push(Envelope {
                role: waypoint.role,
                region,
            });
        }
    }
    debug!(
        envelopes = envelopes.len(),
        declutter = params.declutter,
        "built tolerance envelopes",
    );

    Ok(envelopes)
}
