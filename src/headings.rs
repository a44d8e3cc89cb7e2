use crate::util::BoundedAngle;
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;
use uom::si::angle::{degree, radian};
use uom::si::f64::Angle;

#[cfg(any(test, feature = "approx"))]
use approx::{AbsDiffEq, RelativeEq};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Marks a heading as referenced to true (geographic) north.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct True;

/// Marks a heading as referenced to magnetic north.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Magnetic;

/// Defines the north reference a [`Heading`] is measured against.
///
/// Range reference data is magnetic-referenced while planner overrides arrive true-referenced;
/// keeping the reference in the type means the two cannot be mixed without an explicit
/// conversion through a [`Declination`].
pub trait NorthReference {
    /// Single-letter designator used when displaying a heading ("T" or "M").
    const DESIGNATOR: char;
}

impl NorthReference for True {
    const DESIGNATOR: char = 'T';
}

impl NorthReference for Magnetic {
    const DESIGNATOR: char = 'M';
}

/// The local angular offset between true north and magnetic north at a range.
///
/// East declination is positive: `true = magnetic + declination`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Declination(Angle);

impl Declination {
    pub fn new(angle: impl Into<Angle>) -> Self {
        Self(angle.into())
    }

    #[must_use]
    pub fn angle(&self) -> Angle {
        self.0
    }
}

/// A compass heading (clockwise from north) referenced to the north flavor `Ref`.
///
/// Headings normalize into [0°, 360°) on construction and after every operation, so `-90°` and
/// `270°` name the same heading. The reference marker ([`True`] or [`Magnetic`]) makes it a type
/// error to hand a true-referenced planner override to code expecting the range's magnetic
/// frame; cross the boundary with [`Heading::to_magnetic`] or [`Heading::to_true`].
#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
// don't require Ref: Serialize/Deserialize since we skip it anyway
#[cfg_attr(feature = "serde", serde(bound = ""))]
pub struct Heading<Ref> {
    azimuth: Angle,

    #[cfg_attr(feature = "serde", serde(skip))]
    reference: PhantomData<Ref>,
}

/// A heading referenced to true north.
pub type TrueHeading = Heading<True>;

/// A heading referenced to magnetic north.
pub type MagneticHeading = Heading<Magnetic>;

// manual impls of Clone and Copy to avoid requiring Ref: Copy + Clone
impl<Ref> Clone for Heading<Ref> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<Ref> Copy for Heading<Ref> {}

impl<Ref> Heading<Ref> {
    /// Constructs a heading from an angle measured clockwise from `Ref`'s north.
    ///
    /// The angle is normalized into [0°, 360°).
    #[must_use]
    pub fn new(azimuth: impl Into<Angle>) -> Self {
        Self {
            azimuth: Angle::new::<radian>(BoundedAngle::new(azimuth.into()).get_bounded()),
            reference: PhantomData,
        }
    }

    /// Returns the heading's angle in [0°, 360°).
    #[must_use]
    pub fn angle(&self) -> Angle {
        Angle::new::<radian>(BoundedAngle::new(self.azimuth).get_bounded())
    }

    /// Returns the opposite heading (this heading rotated by 180°).
    ///
    /// The inbound attack corridor extends from the target along the reciprocal of the attack
    /// heading, so this is how "out to the base point" is expressed.
    #[must_use]
    pub fn reciprocal(self) -> Self {
        Self::new(self.azimuth + Angle::HALF_TURN)
    }

    /// Returns this heading rotated by `delta` (positive clockwise), normalized into
    /// [0°, 360°).
    #[must_use]
    pub fn offset(self, delta: impl Into<Angle>) -> Self {
        Self::new(self.azimuth + delta.into())
    }
}

impl Heading<True> {
    /// Re-references this true heading against magnetic north using the range's local
    /// declination.
    ///
    /// Total: any true heading has a magnetic equivalent. With zero declination this is the
    /// identity modulo 360°.
    #[must_use]
    pub fn to_magnetic(self, declination: Declination) -> Heading<Magnetic> {
        Heading::new(self.azimuth - declination.0)
    }
}

impl Heading<Magnetic> {
    /// Re-references this magnetic heading against true north using the range's local
    /// declination.
    #[must_use]
    pub fn to_true(self, declination: Declination) -> Heading<True> {
        Heading::new(self.azimuth + declination.0)
    }
}

impl<Ref: NorthReference> Display for Heading<Ref> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:03.0}°{}",
            self.angle().get::<degree>(),
            Ref::DESIGNATOR
        )
    }
}

impl<Ref> PartialEq<Self> for Heading<Ref> {
    fn eq(&self, other: &Self) -> bool {
        self.azimuth.eq(&other.azimuth)
    }
}

#[cfg(any(test, feature = "approx"))]
impl<Ref> AbsDiffEq<Self> for Heading<Ref> {
    type Epsilon = <f64 as AbsDiffEq>::Epsilon;

    fn default_epsilon() -> Self::Epsilon {
        BoundedAngle::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        BoundedAngle::abs_diff_eq(
            &BoundedAngle::new(self.azimuth),
            &BoundedAngle::new(other.azimuth),
            epsilon,
        )
    }
}

#[cfg(any(test, feature = "approx"))]
impl<Ref> RelativeEq for Heading<Ref> {
    fn default_max_relative() -> Self::Epsilon {
        BoundedAngle::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        BoundedAngle::relative_eq(
            &BoundedAngle::new(self.azimuth),
            &BoundedAngle::new(other.azimuth),
            epsilon,
            max_relative,
        )
    }
}
