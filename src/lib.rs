//! This library computes the three-dimensional geometry of a simulated low-level attack
//! profile ("SLED") against a fixed range target, and expresses that geometry as a set of
//! renderable primitives for a flight-simulation visualization tool.
//!
//! Planners specify an attack pattern (base distance, the base/track/release/abort/minimum
//! altitude ladder, aim-off distance, and heading/altitude leeways) and receive a [`Scene`]
//! describing the attack corridor, its tolerance envelopes, and the abort/minimum reference
//! surfaces, all anchored to a real-world target location.
//!
//! The engine is purely computational: it consumes a resolved [`Target`] record and a
//! validated [`ProfileParameters`] set, and produces a [`Scene`] value. Parsing user input,
//! storing reference data, and writing output files are its callers' concerns (though the
//! [`catalog`] and [`tacview`] modules provide the reference-data lookup and the Tacview XML
//! rendering the surrounding tool uses).
//!
//! Headings are unit-tagged so that true- and magnetic-referenced values cannot be mixed by
//! accident: range data is magnetic-referenced, planner overrides arrive as a
//! [`TrueHeading`], and the conversion through the range's [`Declination`] is explicit. All
//! distances and angles are [`uom`] quantities, so feet, nautical miles, and meters coexist
//! without manual conversion factors.
//!
//! # Examples
//!
//! ```
//! use sledge::{Declination, GeoPoint, Heading, Magnetic, ProfileParameters, Scene, Target};
//! use uom::si::f64::{Angle, Length};
//! use uom::si::angle::degree;
//! use uom::si::length::{foot, meter, nautical_mile};
//!
//! // normally resolved from the range catalog:
//! let target = Target {
//!     name: "revetment".to_owned(),
//!     anchor: Some(
//!         GeoPoint::builder()
//!             .latitude(Angle::new::<degree>(34.))
//!             .expect("latitude is in [-90°, 90°]")
//!             .longitude(Angle::new::<degree>(-117.))
//!             .altitude(Length::new::<meter>(0.))
//!             .build(),
//!     ),
//!     attack_heading: Heading::<Magnetic>::new(Angle::new::<degree>(270.)),
//!     declination: Declination::new(Angle::new::<degree>(10.)),
//! };
//!
//! // normally validated and converted by the configuration layer:
//! let params = ProfileParameters {
//!     base_distance: Length::new::<nautical_mile>(5.),
//!     base_altitude: Length::new::<foot>(2_000.),
//!     track_altitude: Length::new::<foot>(1_500.),
//!     release_altitude: Length::new::<foot>(1_000.),
//!     abort_altitude: Length::new::<foot>(500.),
//!     minimum_altitude: Length::new::<foot>(200.),
//!     aim_off_distance: Length::new::<foot>(300.),
//!     altitude_leeway: Length::new::<foot>(200.),
//!     heading_leeway: Angle::new::<degree>(10.),
//!     attack_heading_override: None,
//!     declutter: false,
//! };
//!
//! let scene = Scene::assemble(&target, &params)?;
//! for primitive in scene.primitives() {
//!     println!("{}", primitive.label());
//! }
//! # Ok::<(), sledge::ProfileError>(())
//! ```
//!
//! The individual pipeline stages are available through the [`waypoints`] and [`envelopes`]
//! modules when a caller needs the derived corridor or the tolerance regions without
//! assembling a full scene.

mod util;

mod error;
mod geodesy;
mod headings;
mod profile;
mod scene;

pub mod envelopes;
pub mod waypoints;

#[cfg(feature = "serde")]
pub mod catalog;
pub mod tacview;

// re-structure our imports slightly to better match user expectation
/// Argument and builder types for constructing the library's value types.
pub mod builder {
    /// Builder machinery for [`GeoPoint`](crate::GeoPoint).
    pub mod geo_point {
        pub use crate::geodesy::{
            Builder, Components, HasAltitude, HasLatitude, HasLongitude, MissingAltitude,
            MissingLatitude, MissingLongitude,
        };
    }
}

pub use envelopes::{Envelope, ToleranceRegion};
pub use error::{ConfigurationError, GeometryError, ProfileError};
pub use geodesy::GeoPoint;
pub use headings::{
    Declination, Heading, Magnetic, MagneticHeading, NorthReference, True, TrueHeading,
};
pub use profile::{ProfileParameters, Target};
pub use scene::{Element, Primitive, Scene};
pub use waypoints::{Corridor, Waypoint, WaypointRole};
