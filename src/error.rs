use thiserror::Error;

/// Malformed or missing target/parameter fields reaching the engine despite upstream
/// validation.
///
/// The configuration layer is expected to hand the engine only validated records; a bad
/// record that slips through must surface as a distinct failure rather than a scene anchored
/// at (0, 0).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigurationError {
    /// The resolved target record carries no anchor coordinates.
    #[error("target \"{target}\" has no anchor coordinates")]
    MissingAnchor { target: String },

    /// A distance or altitude parameter is NaN or infinite.
    #[error("{field} must be a finite quantity")]
    NonFiniteParameter { field: &'static str },

    /// A distance or altitude parameter is negative.
    #[error("{field} must not be negative")]
    NegativeParameter { field: &'static str },

    /// The base distance is zero, leaving no corridor to construct.
    #[error("base distance must be greater than zero")]
    DegenerateBaseDistance,
}

/// Numerically degenerate projection inputs or outputs.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GeometryError {
    /// A great-circle projection produced a non-finite destination.
    #[error(
        "projecting {distance_meters} m along {bearing_degrees}° from {origin} produced a \
         non-finite destination"
    )]
    UnprojectablePoint {
        origin: crate::GeoPoint,
        bearing_degrees: f64,
        distance_meters: f64,
    },
}

/// The engine's failure surface.
///
/// Both kinds abort the invocation's scene construction without partial state; a
/// [`Scene`](crate::Scene) is either fully constructed or not produced at all.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}
