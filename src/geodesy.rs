use crate::error::GeometryError;
use crate::util::BoundedAngle;
use std::fmt;
use std::fmt::Display;
use std::marker::PhantomData;
use uom::si::f64::{Angle, Length};
use uom::si::{
    angle::{degree, radian},
    length::meter,
};
use uom::ConstZero;

#[cfg(any(test, feature = "approx"))]
use approx::{AbsDiffEq, RelativeEq};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Mean radius of Earth in meters, as recommended by the IUGG.
///
/// Ranges are local (distances of tens of kilometers at most), so the engine uses a spherical
/// Earth model with this fixed radius for all great-circle math.
///
/// <https://en.wikipedia.org/wiki/Earth_radius#Mean_radius>
pub(crate) const MEAN_EARTH_RADIUS: f64 = 6_371_008.8;

/// An Earth-bound location: latitude, longitude, and altitude above mean sea level.
///
/// Immutable once computed; every derived location (waypoints, cone rays) is a fresh value
/// produced by [`GeoPoint::project`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeoPoint {
    // NOTE: uom does not guarantee how these angles are normalized -- they might be [-180,180)
    // or [0,360), or something else altogether. we do not normalize them ourselves because
    // callers will generally feed the values into formulas that also don't care; the accessors
    // normalize on the way out.
    latitude: Angle,
    longitude: Angle,
    altitude: Length,
}

impl GeoPoint {
    /// Constructs a location from latitude, longitude, and altitude.
    ///
    /// The latitude must be in [-90°,90°] % 360°. If it is not, this function returns `None`.
    ///
    /// The altitude is measured above mean sea level.
    #[must_use]
    pub fn build(
        Components {
            latitude,
            longitude,
            altitude,
        }: Components,
    ) -> Option<Self> {
        Some(
            Self::builder()
                .latitude(latitude)?
                .longitude(longitude)
                .altitude(altitude)
                .build(),
        )
    }

    /// Provides a constructor for a [`GeoPoint`].
    pub fn builder() -> Builder<MissingLatitude, MissingLongitude, MissingAltitude> {
        Builder {
            under_construction: GeoPoint {
                latitude: Angle::ZERO,
                longitude: Angle::ZERO,
                altitude: Length::ZERO,
            },
            has: (PhantomData, PhantomData, PhantomData),
        }
    }

    /// Returns the number of degrees latitude north of the equator.
    ///
    /// The returned value is always in [-90, 90].
    #[must_use]
    pub fn latitude(&self) -> Angle {
        Angle::new::<radian>(BoundedAngle::new(self.latitude).to_signed_range())
    }

    /// Returns the number of degrees longitude east of the prime meridian.
    ///
    /// The returned value is always in [-180, 180).
    #[must_use]
    pub fn longitude(&self) -> Angle {
        Angle::new::<radian>(BoundedAngle::new(self.longitude).to_signed_range())
    }

    /// Returns the altitude above mean sea level.
    #[must_use]
    pub fn altitude(&self) -> Length {
        self.altitude
    }

    /// Returns this horizontal position at a different altitude.
    #[must_use]
    pub fn with_altitude(&self, altitude: Length) -> Self {
        Self { altitude, ..*self }
    }

    /// Computes the [great-circle distance] between the two locations on the surface of
    /// the earth (altitudes are ignored).
    ///
    /// The current implementation computes this [using the archaversine] (inverse haversine).
    ///
    /// [great-circle distance]: https://en.wikipedia.org/wiki/Great-circle_distance
    /// [using the archaversine]: https://en.wikipedia.org/wiki/Haversine_formula#Formulation
    #[doc(alias = "great_circle_distance")]
    #[must_use]
    pub fn haversine_distance_on_surface(&self, other: &GeoPoint) -> Length {
        let central_angle = central_angle_by_inverse_haversine(
            self.latitude,
            other.latitude,
            self.longitude,
            other.longitude,
        );

        central_angle * Length::new::<meter>(MEAN_EARTH_RADIUS)
    }

    /// Computes the initial bearing (clockwise from north, in [0°, 360°)) of the great-circle
    /// path from `self` towards `other`.
    ///
    /// Returns `None` when the two locations share a horizontal position, where every bearing
    /// is equally valid.
    #[must_use]
    pub fn initial_bearing_towards(&self, other: &GeoPoint) -> Option<Angle> {
        let lat_a = self.latitude().get::<radian>();
        let lat_b = other.latitude().get::<radian>();
        let delta_lon = other.longitude().get::<radian>() - self.longitude().get::<radian>();

        let x = delta_lon.sin() * lat_b.cos();
        let y = lat_a.cos() * lat_b.sin() - lat_a.sin() * lat_b.cos() * delta_lon.cos();
        if x == 0. && y == 0. {
            return None;
        }

        Some(Angle::new::<radian>(
            BoundedAngle::new(Angle::new::<radian>(x.atan2(y))).get_bounded(),
        ))
    }

    /// Computes the destination reached by travelling `distance` along the great-circle path
    /// that leaves `self` at `bearing` (clockwise from north, taken modulo 360°).
    ///
    /// Projection is two-dimensional: the destination's altitude is the caller-supplied
    /// `altitude`, independent of the origin's. A `distance` of exactly zero returns the
    /// origin's horizontal position unchanged (bit-identical) at the requested altitude.
    ///
    /// The destination is computed on the spherical Earth model ([`MEAN_EARTH_RADIUS`]); a
    /// non-finite result surfaces as [`GeometryError`] rather than a silently wrong point.
    pub fn project(
        &self,
        bearing: impl Into<Angle>,
        distance: Length,
        altitude: Length,
    ) -> Result<GeoPoint, GeometryError> {
        if distance == Length::ZERO {
            return Ok(self.with_altitude(altitude));
        }

        let bearing = BoundedAngle::new(bearing.into()).get_bounded();
        let lat_origin = self.latitude().get::<radian>();
        let lon_origin = self.longitude().get::<radian>();
        let central_angle = distance.get::<meter>() / MEAN_EARTH_RADIUS;

        // https://en.wikipedia.org/wiki/Great-circle_navigation#Finding_way-points
        let lat_destination = (lat_origin.sin() * central_angle.cos()
            + lat_origin.cos() * central_angle.sin() * bearing.cos())
        .asin();
        let lon_destination = lon_origin
            + (bearing.sin() * central_angle.sin() * lat_origin.cos())
                .atan2(central_angle.cos() - lat_origin.sin() * lat_destination.sin());

        if !lat_destination.is_finite() || !lon_destination.is_finite() {
            return Err(GeometryError::UnprojectablePoint {
                origin: *self,
                bearing_degrees: bearing.to_degrees(),
                distance_meters: distance.get::<meter>(),
            });
        }

        Ok(Self::builder()
            .latitude(Angle::new::<radian>(lat_destination))
            .expect("asin produces latitude in [-90°,90°]")
            .longitude(Angle::new::<radian>(lon_destination))
            .altitude(altitude)
            .build())
    }
}

impl Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lat = self.latitude();
        let lat_is_positive = lat.is_sign_positive();
        let lat = lat.abs().get::<degree>();
        let lon = self.longitude();
        let lon_is_positive = lon.is_sign_positive();
        let lon = lon.abs().get::<degree>();
        let alt = self.altitude.get::<meter>();
        match (lat_is_positive, lon_is_positive) {
            (true, true) => write!(f, "{lat}°N, {lon}°E, {alt}m"),
            (true, false) => write!(f, "{lat}°N, {lon}°W, {alt}m"),
            (false, true) => write!(f, "{lat}°S, {lon}°E, {alt}m"),
            (false, false) => write!(f, "{lat}°S, {lon}°W, {alt}m"),
        }
    }
}

/// Computes the central angle between the given lat/lon points.
///
/// To turn this angle into [great-circle distance], multiply this value by the radius of the
/// sphere (ie, of the earth).
///
/// [great-circle distance]: https://en.wikipedia.org/wiki/Great-circle_distance
pub(crate) fn central_angle_by_inverse_haversine(
    lat_a: Angle,
    lat_b: Angle,
    lon_a: Angle,
    lon_b: Angle,
) -> Angle {
    let lat_a = lat_a.get::<radian>(); // φ1
    let lat_b = lat_b.get::<radian>(); // φ2
    let lon_a = lon_a.get::<radian>(); // λ1
    let lon_b = lon_b.get::<radian>(); // λ2
    let delta_lat = lat_b - lat_a;
    let delta_lon = lon_b - lon_a;

    let inner = 1. - delta_lat.cos() + lat_a.cos() * lat_b.cos() * (1. - delta_lon.cos());
    Angle::new::<radian>(2. * (inner / 2.).sqrt().asin())
}

#[cfg(any(test, feature = "approx"))]
impl AbsDiffEq<Self> for GeoPoint {
    type Epsilon = Length;

    fn default_epsilon() -> Self::Epsilon {
        // NOTE: this value is in meters. sub-meter precision is plenty for range geometry, and
        // the spherical model is itself only an approximation of the earth.
        Length::new::<meter>(0.75)
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.haversine_distance_on_surface(other) < epsilon
            && self.altitude.get::<meter>().abs_diff_eq(
                &other.altitude.get::<meter>(),
                epsilon.get::<meter>(),
            )
    }
}

#[cfg(any(test, feature = "approx"))]
impl RelativeEq for GeoPoint {
    fn default_max_relative() -> Self::Epsilon {
        Length::new::<meter>(f64::default_max_relative())
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.haversine_distance_on_surface(other)
            .get::<meter>()
            .abs_diff_eq(&0., epsilon.get::<meter>())
            && self.altitude.get::<meter>().relative_eq(
                &other.altitude.get::<meter>(),
                epsilon.get::<meter>(),
                max_relative.get::<meter>(),
            )
    }
}

/// Argument type for [`GeoPoint::build`].
#[derive(Debug, Default)]
#[must_use]
pub struct Components {
    /// The latitude angle of the proposed [`GeoPoint`].
    ///
    /// The latitude must be in [-90°,90°] % 360°. If it is not, construction returns `None`.
    pub latitude: Angle,

    /// The longitude angle of the proposed [`GeoPoint`].
    pub longitude: Angle,

    /// The altitude of the proposed [`GeoPoint`], above mean sea level.
    pub altitude: Length,
}

/// Used to indicate that a partially-constructed [`GeoPoint`] is missing the latitude component.
pub struct MissingLatitude;
/// Used to indicate that a partially-constructed [`GeoPoint`] has the latitude component set.
pub struct HasLatitude;
/// Used to indicate that a partially-constructed [`GeoPoint`] is missing the longitude component.
pub struct MissingLongitude;
/// Used to indicate that a partially-constructed [`GeoPoint`] has the longitude component set.
pub struct HasLongitude;
/// Used to indicate that a partially-constructed [`GeoPoint`] is missing the altitude component.
pub struct MissingAltitude;
/// Used to indicate that a partially-constructed [`GeoPoint`] has the altitude component set.
pub struct HasAltitude;

/// [Builder] for a [`GeoPoint`].
///
/// Construct one through [`GeoPoint::builder`], and finalize with [`Builder::build`].
///
/// [Builder]: https://rust-unofficial.github.io/patterns/patterns/creational/builder.html
#[derive(Debug)]
#[must_use]
pub struct Builder<Latitude, Longitude, Altitude> {
    under_construction: GeoPoint,
    has: (
        PhantomData<Latitude>,
        PhantomData<Longitude>,
        PhantomData<Altitude>,
    ),
}

// manual impls of Clone and Copy to avoid requiring the markers to be Copy + Clone
impl<L1, L2, A> Clone for Builder<L1, L2, A> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<L1, L2, A> Copy for Builder<L1, L2, A> {}

impl<L1, L2, A> Builder<L1, L2, A> {
    /// Sets the latitudal angle of the [`GeoPoint`]-to-be.
    ///
    /// The latitude must be in [-90°,90°] % 360°. If it is not, this function returns `None`.
    pub fn latitude(mut self, latitude: impl Into<Angle>) -> Option<Builder<HasLatitude, L2, A>> {
        let latitude = latitude.into();
        let latitude_in_signed_radians = BoundedAngle::new(latitude).to_signed_range();
        if !(-std::f64::consts::FRAC_PI_2..=std::f64::consts::FRAC_PI_2)
            .contains(&latitude_in_signed_radians)
        {
            None
        } else {
            self.under_construction.latitude = latitude;
            Some(Builder {
                under_construction: self.under_construction,
                has: (PhantomData::<HasLatitude>, self.has.1, self.has.2),
            })
        }
    }

    /// Sets the longitudal angle of the [`GeoPoint`]-to-be.
    pub fn longitude(mut self, longitude: impl Into<Angle>) -> Builder<L1, HasLongitude, A> {
        self.under_construction.longitude = longitude.into();
        Builder {
            under_construction: self.under_construction,
            has: (self.has.0, PhantomData::<HasLongitude>, self.has.2),
        }
    }

    /// Sets the altitude of the [`GeoPoint`]-to-be, above mean sea level.
    pub fn altitude(mut self, altitude: impl Into<Length>) -> Builder<L1, L2, HasAltitude> {
        self.under_construction.altitude = altitude.into();
        Builder {
            under_construction: self.under_construction,
            has: (self.has.0, self.has.1, PhantomData::<HasAltitude>),
        }
    }
}

impl Builder<HasLatitude, HasLongitude, HasAltitude> {
    #[must_use]
    pub fn build(self) -> GeoPoint {
        self.under_construction
    }
}

#[cfg(test)]
mod tests {
    use super::{Components, GeoPoint, MEAN_EARTH_RADIUS};
    use approx::assert_relative_eq;
    use quickcheck::quickcheck;
    use rstest::rstest;
    use uom::si::f64::{Angle, Length};
    use uom::si::{
        angle::{degree, radian},
        length::meter,
    };

    fn m(meters: f64) -> Length {
        Length::new::<meter>(meters)
    }
    fn d(degrees: f64) -> Angle {
        Angle::new::<degree>(degrees)
    }
    fn point(lat: f64, lon: f64, alt: f64) -> GeoPoint {
        GeoPoint::build(Components {
            latitude: d(lat),
            longitude: d(lon),
            altitude: m(alt),
        })
        .expect("latitude in [-90,90]")
    }

    /// Distance covering one degree of arc on the spherical model.
    fn one_degree_of_arc() -> Length {
        m(MEAN_EARTH_RADIUS * 1.0_f64.to_radians())
    }

    impl quickcheck::Arbitrary for GeoPoint {
        fn arbitrary(g: &mut quickcheck::Gen) -> Self {
            // quickcheck will give us awkward f64 values -- we ignore those
            let mut finite = || loop {
                match f64::arbitrary(g) {
                    0. => break 0.,
                    f if f.is_normal() => break f,
                    _ => {}
                }
            };
            let latitude = finite();
            let longitude = finite();
            let altitude = finite();
            Self {
                latitude: Angle::new::<radian>(
                    latitude.rem_euclid(std::f64::consts::PI) - std::f64::consts::FRAC_PI_2,
                ),
                longitude: Angle::new::<radian>(longitude.rem_euclid(std::f64::consts::TAU)),
                altitude: Length::new::<meter>(altitude.rem_euclid(20000.)),
            }
        }
    }

    #[rstest]
    #[case(d(90.9948211), d(7.8211606), m(1000.))]
    #[case(d(190.112282), d(19.880389), m(0.))]
    fn rejects_bad_latitudes(#[case] latitude: Angle, #[case] longitude: Angle, #[case] altitude: Length) {
        assert_eq!(
            GeoPoint::build(Components {
                latitude,
                longitude,
                altitude
            }),
            None,
            "latitude outside [-90,90] should be rejected"
        );
    }

    #[test]
    fn zero_distance_projection_returns_origin_at_requested_altitude() {
        let origin = point(34., -117., 120.);
        for bearing in [0., 90., 217.3, 359.] {
            let projected = origin
                .project(d(bearing), m(0.), m(450.))
                .expect("zero distance never degenerates");
            assert_eq!(projected.latitude(), origin.latitude());
            assert_eq!(projected.longitude(), origin.longitude());
            assert_eq!(projected.altitude(), m(450.));
        }
    }

    #[rstest]
    // one degree of arc due north from the equator
    #[case(point(0., 0., 0.), 0., 1., 0.)]
    // one degree of arc due east along the equator
    #[case(point(0., 0., 0.), 90., 0., 1.)]
    // due south across the equator
    #[case(point(0.5, 10., 0.), 180., -0.5, 10.)]
    // bearing is taken modulo 360
    #[case(point(0., 0., 0.), 360. + 90., 0., 1.)]
    fn projects_known_points(
        #[case] origin: GeoPoint,
        #[case] bearing: f64,
        #[case] expected_lat: f64,
        #[case] expected_lon: f64,
    ) {
        let destination = origin
            .project(d(bearing), one_degree_of_arc(), m(0.))
            .expect("local projection stays finite");
        assert_relative_eq!(destination.latitude().get::<degree>(), expected_lat, epsilon = 1e-9);
        assert_relative_eq!(destination.longitude().get::<degree>(), expected_lon, epsilon = 1e-9);
    }

    #[test]
    fn pole_crossing_projection_stays_stable() {
        let origin = point(89.5, 0., 0.);
        let destination = origin
            .project(d(0.), one_degree_of_arc(), m(0.))
            .expect("pole crossing must not degenerate");

        // one degree due north from 89.5°N crosses the pole and comes down the 180° meridian
        assert_relative_eq!(destination.latitude().get::<degree>(), 89.5, epsilon = 1e-9);
        assert_relative_eq!(
            destination.longitude().get::<degree>().abs(),
            180.,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            origin
                .haversine_distance_on_surface(&destination)
                .get::<meter>(),
            one_degree_of_arc().get::<meter>(),
            epsilon = 1e-3
        );
    }

    #[test]
    fn initial_bearing_points_at_the_destination() {
        let origin = point(34., -117., 0.);
        let destination = origin
            .project(d(90.), m(9_260.), m(0.))
            .expect("local projection stays finite");
        let bearing = origin
            .initial_bearing_towards(&destination)
            .expect("distinct points have a bearing");
        assert_relative_eq!(bearing.get::<degree>(), 90., epsilon = 1e-6);

        assert_eq!(origin.initial_bearing_towards(&origin), None);
    }

    #[test]
    fn projection_agrees_with_independent_geodesy() {
        let origin = point(34., -117., 0.);
        let destination = origin
            .project(d(90.), m(9_260.), m(0.))
            .expect("local projection stays finite");

        let reference_origin = nav_types::WGS84::from_degrees_and_meters(34., -117., 0.);
        let reference_destination = nav_types::WGS84::from_degrees_and_meters(
            destination.latitude().get::<degree>(),
            destination.longitude().get::<degree>(),
            0.,
        );

        // nav-types measures the straight-line distance on the WGS84 ellipsoid; at this range
        // the chord-vs-arc difference is sub-millimeter, but sphere-vs-ellipsoid curvature
        // differs by up to ~0.3%, so the tolerance is correspondingly loose.
        assert_relative_eq!(
            reference_origin.distance(&reference_destination),
            9_260.,
            epsilon = 30.
        );
    }

    quickcheck! {
        fn zero_distance_projection_is_identity(origin: GeoPoint, bearing: f64) -> () {
            let bearing = d(if bearing.is_finite() { bearing.rem_euclid(360.) } else { 0. });
            let projected = origin
                .project(bearing, m(0.), origin.altitude())
                .expect("zero distance never degenerates");
            assert_eq!(projected, origin);
        }

        fn projected_points_are_the_requested_distance_away(
            origin: GeoPoint,
            bearing: f64,
            distance: f64
        ) -> () {
            let bearing = d(if bearing.is_finite() { bearing.rem_euclid(360.) } else { 0. });
            let distance = if distance.is_finite() {
                1. + distance.abs().rem_euclid(50_000.)
            } else {
                1_000.
            };

            let projected = origin
                .project(bearing, m(distance), m(0.))
                .expect("range-scale projection stays finite");
            assert!(
                projected.latitude() != origin.latitude()
                    || projected.longitude() != origin.longitude()
            );
            assert_relative_eq!(
                origin.haversine_distance_on_surface(&projected).get::<meter>(),
                distance,
                epsilon = 1e-2
            );
        }
    }

    #[test]
    fn displays_quadrants() {
        assert_eq!(point(0., 0., 0.).to_string(), "0°N, 0°E, 0m");
    }
}
