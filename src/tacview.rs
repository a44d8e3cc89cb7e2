//! Renders a [`Scene`] into the XML exchange document consumed by the Tacview 3-D viewer.
//!
//! This is the external serializer side of the engine's output contract: it consumes the
//! public [`Scene`] surface only, and the engine knows nothing about this format. Output is
//! deterministic (fixed primitive order from the scene, fixed-precision numbers: six decimal
//! places for degrees, two for meters), so generated files diff cleanly between runs.

use crate::envelopes::ToleranceRegion;
use crate::geodesy::GeoPoint;
use crate::scene::{Element, Scene};
use std::fmt::Write;
use uom::si::angle::degree;
use uom::si::f64::Length;
use uom::si::length::meter;

/// Serializes the scene into an XML document string.
#[must_use]
pub fn to_xml(scene: &Scene) -> String {
    let mut out = String::new();
    write_document(scene, &mut out).expect("writing to a String cannot fail");
    out
}

fn write_document(scene: &Scene, out: &mut impl Write) -> std::fmt::Result {
    writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(out, "<SledScene>")?;
    for primitive in scene.primitives() {
        let label = escape(primitive.label());
        match primitive.element() {
            Element::Waypoint(waypoint) => {
                writeln!(out, r#"  <Primitive Kind="Waypoint" Label="{label}">"#)?;
                write_point(out, &waypoint.point)?;
            }
            Element::Centerline { from, to } => {
                writeln!(out, r#"  <Primitive Kind="Line" Label="{label}">"#)?;
                write_point(out, from)?;
                write_point(out, to)?;
            }
            Element::Envelope(envelope) => match &envelope.region {
                ToleranceRegion::Cone {
                    apex,
                    left,
                    right,
                    radius,
                } => {
                    writeln!(
                        out,
                        r#"  <Primitive Kind="Cone" Label="{label}" Radius="{radius}">"#,
                        radius = Meters(*radius),
                    )?;
                    write_point(out, apex)?;
                    write_point(out, left)?;
                    write_point(out, right)?;
                }
                ToleranceRegion::Band { at, floor, ceiling } => {
                    writeln!(
                        out,
                        r#"  <Primitive Kind="Band" Label="{label}" Floor="{floor}" Ceiling="{ceiling}">"#,
                        floor = Meters(*floor),
                        ceiling = Meters(*ceiling),
                    )?;
                    write_point(out, at)?;
                }
                ToleranceRegion::Plane { center, radius } => {
                    writeln!(
                        out,
                        r#"  <Primitive Kind="Plane" Label="{label}" Radius="{radius}">"#,
                        radius = Meters(*radius),
                    )?;
                    write_point(out, center)?;
                }
            },
        }
        writeln!(out, "  </Primitive>")?;
    }
    writeln!(out, "</SledScene>")
}

fn write_point(out: &mut impl Write, point: &GeoPoint) -> std::fmt::Result {
    writeln!(
        out,
        r#"    <Point Latitude="{lat:.6}" Longitude="{lon:.6}" Altitude="{alt}"/>"#,
        lat = point.latitude().get::<degree>(),
        lon = point.longitude().get::<degree>(),
        alt = Meters(point.altitude()),
    )
}

/// Formats a length in meters with the document's fixed precision.
struct Meters(Length);

impl std::fmt::Display for Meters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0.get::<meter>())
    }
}

fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::{escape, to_xml};
    use crate::geodesy::{Components, GeoPoint};
    use crate::headings::{Declination, Heading, Magnetic};
    use crate::profile::{ProfileParameters, Target};
    use crate::scene::Scene;
    use insta::assert_snapshot;
    use uom::si::f64::{Angle, Length};
    use uom::si::{angle::degree, length::meter};

    fn m(meters: f64) -> Length {
        Length::new::<meter>(meters)
    }
    fn d(degrees: f64) -> Angle {
        Angle::new::<degree>(degrees)
    }

    fn scene(declutter: bool) -> Scene {
        let target = Target {
            name: "revetment".to_owned(),
            anchor: GeoPoint::build(Components {
                latitude: d(34.),
                longitude: d(-117.),
                altitude: m(0.),
            }),
            attack_heading: Heading::<Magnetic>::new(d(270.)),
            declination: Declination::new(d(10.)),
        };
        let params = ProfileParameters {
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
            declutter,
        };
        Scene::assemble(&target, &params).expect("sound inputs assemble")
    }

    #[test]
    fn document_structure_mirrors_the_scene() {
        let scene = scene(false);
        let xml = to_xml(&scene);

        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.ends_with("</SledScene>\n"));
        assert_eq!(
            xml.matches("<Primitive ").count(),
            scene.primitives().len()
        );
        assert_eq!(
            xml.matches("</Primitive>").count(),
            scene.primitives().len()
        );
    }

    #[test]
    fn reference_primitives_render_with_input_exact_values() {
        let xml = to_xml(&scene(true));

        // the abort/minimum planes sit on the target anchor, so their numbers are the raw
        // inputs at the document's fixed precision
        assert!(xml.contains(
            r#"  <Primitive Kind="Plane" Label="Minimum Altitude" Radius="3704.00">"#
        ));
        assert!(xml.contains(
            r#"    <Point Latitude="34.000000" Longitude="-117.000000" Altitude="60.00"/>"#
        ));
        assert_snapshot!(
            xml.lines().nth(1).expect("document has a root element"),
            @"<SledScene>"
        );
    }

    #[test]
    fn declutter_swaps_band_elements_for_plane_elements() {
        let cluttered = to_xml(&scene(false));
        assert_eq!(cluttered.matches(r#"Kind="Band""#).count(), 5);
        assert_eq!(cluttered.matches(r#"Kind="Plane""#).count(), 0);

        let decluttered = to_xml(&scene(true));
        assert_eq!(decluttered.matches(r#"Kind="Band""#).count(), 3);
        assert_eq!(decluttered.matches(r#"Kind="Plane""#).count(), 2);
    }

    #[test]
    fn serialization_is_deterministic() {
        assert_eq!(to_xml(&scene(false)), to_xml(&scene(false)));
    }

    #[test]
    fn labels_are_xml_escaped() {
        assert_eq!(escape("Fox & Hound"), "Fox &amp; Hound");
        assert_eq!(escape(r#"<a b="c">"#), "&lt;a b=&quot;c&quot;&gt;");
        assert_eq!(escape("Base"), "Base");
    }
}
