use crate::envelopes::{self, Envelope};
use crate::error::ProfileError;
use crate::geodesy::GeoPoint;
use crate::profile::{ProfileParameters, Target};
use crate::waypoints::{self, Waypoint, WaypointRole};
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One renderable element of the scene.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Element {
    /// A flown waypoint of the attack run.
    Waypoint(Waypoint),
    /// The corridor centerline from the target out to the base point.
    Centerline { from: GeoPoint, to: GeoPoint },
    /// A tolerance region (cone, band, or plane).
    Envelope(Envelope),
}

/// A labelled renderable primitive.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Primitive {
    label: String,
    element: Element,
}

impl Primitive {
    /// The stable display label, derived from the element's semantic role.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn element(&self) -> &Element {
        &self.element
    }
}

/// The computed attack-profile scene: the sole output of the engine.
///
/// Assembly is deterministic: identical inputs always produce an identical scene, with the
/// same primitive order and labels, so output files are reproducible and regression tests can
/// diff whole scenes. The fixed order is: corridor centerline, the flown waypoints (base,
/// track, release, aim-off), then the envelopes in waypoint order with the abort and minimum
/// references last.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Scene {
    primitives: Vec<Primitive>,
}

impl Scene {
    /// Runs the whole pipeline for one profile: derive the corridor, build the envelopes, and
    /// aggregate everything into an ordered, labelled scene.
    ///
    /// There is no partial-success mode: a scene is either fully constructed or the first
    /// failure aborts the invocation.
    pub fn assemble(target: &Target, params: &ProfileParameters) -> Result<Self, ProfileError> {
        let corridor = waypoints::derive(target, params)?;
        let envelopes = envelopes::build(&corridor, params)?;

        let base = corridor
            .waypoint(WaypointRole::Base)
            .expect("a derived corridor always contains a base waypoint");

        let mut primitives =
            Vec::with_capacity(1 + corridor.waypoints().len() + envelopes.len());
        primitives.push(Primitive {
            label: "Corridor".to_owned(),
            element: Element::Centerline {
                from: corridor.anchor(),
                to: base.point,
            },
        });
        for waypoint in corridor.waypoints() {
            // abort/minimum are altitude references, not flown points; they appear through
            // their envelopes only
            if waypoint.role.is_reference() {
                continue;
            }
            primitives.push(Primitive {
                label: waypoint.role.label().to_owned(),
                element: Element::Waypoint(waypoint.clone()),
            });
        }
        for envelope in envelopes {
            primitives.push(Primitive {
                label: envelope.label(),
                element: Element::Envelope(envelope),
            });
        }
        debug!(
            target = %target.name,
            primitives = primitives.len(),
            "assembled scene",
        );

        Ok(Self { primitives })
    }

    /// All primitives in their fixed assembly order.
    #[must_use]
    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }
}
