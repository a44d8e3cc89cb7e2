use crate::error::ConfigurationError;
use crate::geodesy::GeoPoint;
use crate::headings::{Declination, MagneticHeading, TrueHeading};
use uom::si::f64::{Angle, Length};
use uom::si::{angle::degree, length::meter};
use uom::ConstZero;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A resolved range target: the fixed point a SLED profile is anchored to.
///
/// Owned by the external range/target store; the engine only reads it. A record whose
/// reference data carries no coordinates has `anchor: None` and is rejected by the engine with
/// a [`ConfigurationError`] instead of silently defaulting to (0, 0).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Target {
    pub name: String,
    pub anchor: Option<GeoPoint>,
    /// The range's default attack heading, magnetic-referenced like all range data.
    pub attack_heading: MagneticHeading,
    /// Local magnetic declination at the range, east-positive.
    pub declination: Declination,
}

impl Target {
    /// Returns the attack heading the profile is flown on: the planner's true-referenced
    /// override brought into the range's magnetic frame, or the range default when no override
    /// was given.
    #[must_use]
    pub fn effective_attack_heading(&self, override_heading: Option<TrueHeading>) -> MagneticHeading {
        match override_heading {
            Some(heading) => heading.to_magnetic(self.declination),
            None => self.attack_heading,
        }
    }
}

/// The validated parameter set describing one SLED profile.
///
/// All distances and altitudes arrive already converted to meters (the configuration layer
/// parses user units; `uom` carries them here without further conversion). Immutable input to
/// the engine: one invocation, one parameter set, no ambient state.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProfileParameters {
    /// Distance from the target to the base point.
    pub base_distance: Length,
    pub base_altitude: Length,
    pub track_altitude: Length,
    pub release_altitude: Length,
    pub abort_altitude: Length,
    pub minimum_altitude: Length,
    /// Lateral offset of the aim-off point from the target.
    pub aim_off_distance: Length,
    /// ± tolerance applied to the base, track, and release altitudes.
    pub altitude_leeway: Length,
    /// ± tolerance applied to the attack heading.
    pub heading_leeway: Angle,
    /// Planner-required attack heading, true-referenced; overrides the range default.
    pub attack_heading_override: Option<TrueHeading>,
    /// Render abort/minimum altitudes as reference planes instead of bands.
    pub declutter: bool,
}

impl ProfileParameters {
    /// Re-checks the invariants the upstream validation layer is supposed to guarantee.
    pub(crate) fn validate(&self) -> Result<(), ConfigurationError> {
        for (field, quantity) in [
            ("base distance", self.base_distance),
            ("base altitude", self.base_altitude),
            ("track altitude", self.track_altitude),
            ("release altitude", self.release_altitude),
            ("abort altitude", self.abort_altitude),
            ("minimum altitude", self.minimum_altitude),
            ("aim-off distance", self.aim_off_distance),
            ("altitude leeway", self.altitude_leeway),
        ] {
            let meters = quantity.get::<meter>();
            if !meters.is_finite() {
                return Err(ConfigurationError::NonFiniteParameter { field });
            }
            if meters < 0. {
                return Err(ConfigurationError::NegativeParameter { field });
            }
        }

        let leeway = self.heading_leeway.get::<degree>();
        if !leeway.is_finite() {
            return Err(ConfigurationError::NonFiniteParameter {
                field: "heading leeway",
            });
        }
        if leeway < 0. {
            return Err(ConfigurationError::NegativeParameter {
                field: "heading leeway",
            });
        }

        if self.base_distance == Length::ZERO {
            return Err(ConfigurationError::DegenerateBaseDistance);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ProfileParameters, Target};
    use crate::error::ConfigurationError;
    use crate::geodesy::{Components, GeoPoint};
    use crate::headings::{Declination, Heading, Magnetic, True};
    use approx::assert_abs_diff_eq;
    use uom::si::f64::{Angle, Length};
    use uom::si::{angle::degree, length::meter};

    fn m(meters: f64) -> Length {
        Length::new::<meter>(meters)
    }
    fn d(degrees: f64) -> Angle {
        Angle::new::<degree>(degrees)
    }

    fn target() -> Target {
        Target {
            name: "revetment".to_owned(),
            anchor: GeoPoint::build(Components {
                latitude: d(34.),
                longitude: d(-117.),
                altitude: m(0.),
            }),
            attack_heading: Heading::<Magnetic>::new(d(270.)),
            declination: Declination::new(d(10.)),
        }
    }

    fn params() -> ProfileParameters {
        ProfileParameters {
            base_distance: m(9_260.),
            base_altitude: m(610.),
            track_altitude: m(460.),
            release_altitude: m(300.),
            abort_altitude: m(150.),
            minimum_altitude: m(60.),
            aim_off_distance: m(100.),
            altitude_leeway: m(61.),
            heading_leeway: d(10.),
            attack_heading_override: None,
            declutter: false,
        }
    }

    #[test]
    fn default_attack_heading_applies_without_override() {
        assert_abs_diff_eq!(
            target().effective_attack_heading(None),
            Heading::<Magnetic>::new(d(270.))
        );
    }

    #[test]
    fn override_is_brought_into_the_magnetic_frame() {
        let override_heading = Heading::<True>::new(d(280.));
        assert_abs_diff_eq!(
            target().effective_attack_heading(Some(override_heading)),
            Heading::<Magnetic>::new(d(270.))
        );
    }

    #[test]
    fn validation_accepts_sound_parameters() {
        assert!(params().validate().is_ok());
    }

    #[test]
    fn validation_rejects_bad_quantities() {
        let mut bad = params();
        bad.track_altitude = m(f64::NAN);
        assert!(matches!(
            bad.validate(),
            Err(ConfigurationError::NonFiniteParameter {
                field: "track altitude"
            })
        ));

        let mut bad = params();
        bad.aim_off_distance = m(-5.);
        assert!(matches!(
            bad.validate(),
            Err(ConfigurationError::NegativeParameter {
                field: "aim-off distance"
            })
        ));

        let mut bad = params();
        bad.base_distance = m(0.);
        assert!(matches!(
            bad.validate(),
            Err(ConfigurationError::DegenerateBaseDistance)
        ));
    }
}
