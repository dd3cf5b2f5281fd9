//! Viewport descriptor parsing and `pb` pagination-parameter encoding.
//!
//! The search endpoint scopes results with a positional parameter string
//! (`pb`) built from the map camera: a ground-distance "altitude", the raw
//! longitude and latitude, and the result offset, followed by a fixed blob
//! of provider feature flags.
//!
//! ## Descriptor format
//!
//! ```text
//! @26.410369869420826,74.63477731779587,11z
//! ```
//!
//! Either `.` or `,` may be used as the decimal separator.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ViewportError;

pub const EARTH_RADIUS_METERS: f64 = 6_371_010.0;
/// Angular factor matched against the provider's own viewport unit.
pub const ANGULAR_CONSTANT: f64 = 27.3611;
pub const SCREEN_PIXEL_HEIGHT: f64 = 768.0;
pub const TILE_SIZE: f64 = 256.0;
/// `K` in `altitude = K * cos(lat) / (2^zoom * TILE_SIZE)`.
pub const RADIUS_X_PIXEL_HEIGHT: f64 = ANGULAR_CONSTANT * EARTH_RADIUS_METERS * SCREEN_PIXEL_HEIGHT;

static DESCRIPTOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^@\s*(?P<latitude>[-+]?[0-9]{1,2}(?:[.,][0-9]+)?)\s*,\s*(?P<longitude>[-+]?[0-9]{1,3}(?:[.,][0-9]+)?)\s*,\s*(?P<zoom>[0-9]{1,2}(?:[.,][0-9]+)?)z",
    )
    .expect("valid regex")
});

const PARAMS_HEAD: &str = "!4m8!1m3!1d";
const PARAMS_LONGITUDE: &str = "!2d";
const PARAMS_LATITUDE: &str = "!3d";
const PARAMS_OFFSET: &str = "!3m2!1i1024!2i768!4f13.1!7i20!8i";

/// Provider flag blob appended after the offset. Observed on live traffic;
/// must be sent byte-for-byte.
pub(crate) const TEMPLATE_TAIL: &str = concat!(
    "!10b1!12m25!1m1!18b1!2m3!5m1!6e2!20e3!6m16!4b1!23b1!26i1!27i1!41i2!45b1!49b1!63m",
    "0!67b1!73m0!74i150000!75b1!89b1!105b1!109b1!110m0!10b1!16b1!19m4!2m3!1i360!2i120",
    "!4i8!20m65!2m2!1i203!2i100!3m2!2i4!5b1!6m6!1m2!1i86!2i86!1m2!1i408!2i240!7m50!1m",
    "3!1e1!2b0!3e3!1m3!1e2!2b1!3e2!1m3!1e2!2b0!3e3!1m3!1e3!2b0!3e3!1m3!1e8!2b0!3e3!1m",
    "3!1e3!2b1!3e2!1m3!1e10!2b0!3e3!1m3!1e10!2b1!3e2!1m3!1e9!2b1!3e2!1m3!1e10!2b0!3e3",
    "!1m3!1e10!2b1!3e2!1m3!1e10!2b0!3e4!2b1!4b1!9b0!22m3!1s!2z!7e81!24m55!1m15!13m7!2",
    "b1!3b1!4b1!6i1!8b1!9b1!20b0!18m6!3b1!4b1!5b1!6b1!13b0!14b0!2b1!5m5!2b1!3b1!5b1!6",
    "b1!7b1!10m1!8e3!14m1!3b1!17b1!20m4!1e3!1e6!1e14!1e15!24b1!25b1!26b1!29b1!30m1!2b",
    "1!36b1!43b1!52b1!54m1!1b1!55b1!56m2!1b1!3b1!65m5!3m4!1m3!1m2!1i224!2i298!89b1!26",
    "m4!2m3!1i80!2i92!4i8!30m28!1m6!1m2!1i0!2i0!2m2!1i458!2i768!1m6!1m2!1i974!2i0!2m2",
    "!1i1024!2i768!1m6!1m2!1i0!2i0!2m2!1i1024!2i20!1m6!1m2!1i0!2i748!2m2!1i1024!2i768",
    "!34m16!2b1!3b1!4b1!6b1!8m4!1b1!3b1!4b1!6b1!9b1!12b1!14b1!20b1!23b1!25b1!26b1!37m",
    "1!1e81!42b1!46m1!1e9!47m0!49m1!3b1!50m53!1m49!2m7!1u3!4s!5e1!9s!10m2!3m1!1e1!2m7",
    "!1u2!4s!5e1!9s!10m2!2m1!1e1!2m7!1u16!4s!5e1!9s!10m2!16m1!1e1!2m7!1u16!4s!5e1!9s!",
    "10m2!16m1!1e2!3m11!1u16!2m4!1m2!16m1!1e1!2s!2m4!1m2!16m1!1e2!2s!3m1!1u2!3m1!1u3!",
    "4BIAE!2e2!3m1!3b1!59B!65m0!69i540",
);

/// A parsed map camera position.
///
/// The latitude and longitude keep the exact text they were parsed from so
/// the encoded parameter string echoes the caller's precision unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    latitude: f64,
    longitude: f64,
    zoom: f64,
    raw_latitude: String,
    raw_longitude: String,
}

impl Viewport {
    /// Parses a `@lat,lon,zoomz` descriptor.
    ///
    /// Only the leading descriptor is matched; anything after the `z` (such
    /// as the remainder of a copied maps URL path) is ignored.
    ///
    /// # Errors
    ///
    /// - [`ViewportError::PatternMismatch`] if the text does not start with a
    ///   well-formed descriptor.
    /// - [`ViewportError::OutOfRange`] if latitude exceeds ±90 or longitude
    ///   exceeds ±180.
    pub fn parse(descriptor: &str) -> Result<Self, ViewportError> {
        let mismatch = || ViewportError::PatternMismatch {
            descriptor: descriptor.to_owned(),
        };

        let caps = DESCRIPTOR_RE.captures(descriptor).ok_or_else(mismatch)?;
        let raw_latitude = caps.name("latitude").ok_or_else(mismatch)?.as_str();
        let raw_longitude = caps.name("longitude").ok_or_else(mismatch)?.as_str();
        let raw_zoom = caps.name("zoom").ok_or_else(mismatch)?.as_str();

        let latitude = parse_decimal(raw_latitude).ok_or_else(mismatch)?;
        let longitude = parse_decimal(raw_longitude).ok_or_else(mismatch)?;
        let zoom = parse_decimal(raw_zoom).ok_or_else(mismatch)?;

        if latitude.abs() > 90.0 {
            return Err(ViewportError::OutOfRange {
                descriptor: descriptor.to_owned(),
                field: "latitude",
            });
        }
        if longitude.abs() > 180.0 {
            return Err(ViewportError::OutOfRange {
                descriptor: descriptor.to_owned(),
                field: "longitude",
            });
        }

        Ok(Self {
            latitude,
            longitude,
            zoom,
            raw_latitude: raw_latitude.to_owned(),
            raw_longitude: raw_longitude.to_owned(),
        })
    }

    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Meters of ground represented by one screen pixel at this camera.
    #[must_use]
    pub fn altitude(&self) -> f64 {
        altitude(self.zoom, self.latitude)
    }

    /// Builds the `pb` parameter string for the page starting at `offset`.
    #[must_use]
    pub fn pagination_params(&self, offset: u32) -> String {
        let altitude = self.altitude();
        format!(
            "{PARAMS_HEAD}{altitude}{PARAMS_LONGITUDE}{lon}{PARAMS_LATITUDE}{lat}{PARAMS_OFFSET}{offset}{TEMPLATE_TAIL}",
            lon = self.raw_longitude,
            lat = self.raw_latitude,
        )
    }
}

impl FromStr for Viewport {
    type Err = ViewportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Web-map ground distance per screen pixel for `zoom` at `latitude`
/// (degrees).
///
/// At the poles `cos` is (numerically) zero and so is the result; that value
/// is passed through as-is.
///
/// The `pb` string renders this with `f64`'s `Display`, which never uses
/// exponent notation and drops a trailing `.0` on whole values. Near the
/// poles that yields e.g. `0.00000003202166803284767` where the web client
/// sends `3.202166803284767e-08`; ordinary viewports print identically.
#[must_use]
pub fn altitude(zoom: f64, latitude: f64) -> f64 {
    (RADIUS_X_PIXEL_HEIGHT * latitude.to_radians().cos()) / (2f64.powf(zoom) * TILE_SIZE)
}

/// Parses `descriptor` and encodes the `pb` parameter for `offset` in one
/// step.
///
/// # Errors
///
/// Returns the [`ViewportError`] from [`Viewport::parse`].
pub fn encode_pagination(descriptor: &str, offset: u32) -> Result<String, ViewportError> {
    Ok(Viewport::parse(descriptor)?.pagination_params(offset))
}

fn parse_decimal(raw: &str) -> Option<f64> {
    raw.replace(',', ".").parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const AJMER: &str = "@26.410369869420826,74.63477731779587,11z";

    #[test]
    fn parses_standard_descriptor() {
        let viewport = Viewport::parse(AJMER).unwrap();
        assert!((viewport.latitude() - 26.410_369_869_420_826).abs() < 1e-12);
        assert!((viewport.longitude() - 74.634_777_317_795_87).abs() < 1e-12);
        assert!((viewport.zoom() - 11.0).abs() < f64::EPSILON);
    }

    #[test]
    fn parses_via_from_str() {
        let viewport: Viewport = "@-33.86,151.2,14.5z".parse().unwrap();
        assert!((viewport.latitude() + 33.86).abs() < 1e-12);
        assert!((viewport.zoom() - 14.5).abs() < f64::EPSILON);
    }

    #[test]
    fn accepts_comma_decimal_separator() {
        let viewport = Viewport::parse("@26,41,74,63,11z").unwrap();
        assert!((viewport.latitude() - 26.41).abs() < 1e-12);
        assert!((viewport.longitude() - 74.63).abs() < 1e-12);
        let params = viewport.pagination_params(0);
        assert!(params.contains("!2d74,63!3d26,41!"), "params: {params}");
    }

    #[test]
    fn ignores_trailing_url_text() {
        let viewport = Viewport::parse("@40.7,-74.0,12z/data=!3m1!4b1").unwrap();
        assert!((viewport.longitude() + 74.0).abs() < 1e-12);
    }

    #[test]
    fn missing_trailing_z_is_pattern_mismatch() {
        let err = Viewport::parse("@26.41,74.63,11").unwrap_err();
        assert!(matches!(err, ViewportError::PatternMismatch { .. }));
    }

    #[test]
    fn missing_coordinate_is_pattern_mismatch() {
        let err = Viewport::parse("@26.41,11z").unwrap_err();
        assert!(matches!(err, ViewportError::PatternMismatch { .. }));
    }

    #[test]
    fn missing_at_sign_is_pattern_mismatch() {
        let err = encode_pagination("26.41,74.63,11z", 0).unwrap_err();
        assert!(matches!(err, ViewportError::PatternMismatch { .. }));
    }

    #[test]
    fn empty_descriptor_is_pattern_mismatch() {
        assert!(matches!(
            encode_pagination("", 0),
            Err(ViewportError::PatternMismatch { .. })
        ));
    }

    #[test]
    fn latitude_out_of_range_is_rejected() {
        let err = Viewport::parse("@95.0,10.0,5z").unwrap_err();
        assert!(
            matches!(err, ViewportError::OutOfRange { field: "latitude", .. }),
            "got: {err:?}"
        );
    }

    #[test]
    fn longitude_out_of_range_is_rejected() {
        let err = Viewport::parse("@10.0,-181.5,5z").unwrap_err();
        assert!(
            matches!(err, ViewportError::OutOfRange { field: "longitude", .. }),
            "got: {err:?}"
        );
    }

    #[test]
    fn altitude_at_equator_is_k_over_tile_span() {
        for zoom in [0.0, 1.0, 11.0, 20.0] {
            let expected = RADIUS_X_PIXEL_HEIGHT / (2f64.powf(zoom) * TILE_SIZE);
            assert_eq!(altitude(zoom, 0.0).to_bits(), expected.to_bits());
        }
    }

    #[test]
    fn altitude_halves_per_zoom_level() {
        for zoom in 0..20 {
            let z = f64::from(zoom);
            let wide = altitude(z, 26.41);
            let narrow = altitude(z + 1.0, 26.41);
            assert!(narrow <= wide);
            assert!((wide / narrow - 2.0).abs() < 1e-12);
        }
    }

    #[test]
    fn altitude_at_pole_is_effectively_zero() {
        let viewport = Viewport::parse("@90,0,3z").unwrap();
        assert!(viewport.altitude().abs() < 1e-3);
    }

    #[test]
    fn zoom_zero_is_legal() {
        let viewport = Viewport::parse("@0,0,0z").unwrap();
        assert_eq!(
            viewport.altitude().to_bits(),
            (RADIUS_X_PIXEL_HEIGHT / TILE_SIZE).to_bits()
        );
    }

    #[test]
    fn params_embed_raw_coordinates_and_offset() {
        let params = encode_pagination(AJMER, 40).unwrap();
        let altitude = Viewport::parse(AJMER).unwrap().altitude();
        let expected_head = format!(
            "!4m8!1m3!1d{altitude}!2d74.63477731779587!3d26.410369869420826!3m2!1i1024!2i768!4f13.1!7i20!8i40!10b1!12m25"
        );
        assert!(params.starts_with(&expected_head), "params: {params}");
        assert!(params.ends_with("!4BIAE!2e2!3m1!3b1!59B!65m0!69i540"));
    }

    #[test]
    fn encoding_is_deterministic() {
        assert_eq!(
            encode_pagination(AJMER, 20).unwrap(),
            encode_pagination(AJMER, 20).unwrap()
        );
    }

    #[test]
    fn only_offset_changes_between_pages() {
        let first = encode_pagination(AJMER, 0).unwrap();
        let second = encode_pagination(AJMER, 20).unwrap();
        assert_ne!(first, second);
        assert_eq!(first.replacen("!8i0!", "!8i20!", 1), second);
    }

    #[test]
    fn only_altitude_changes_between_zoom_levels() {
        let near = Viewport::parse("@26.41,74.63,15z").unwrap();
        let far = Viewport::parse("@26.41,74.63,11z").unwrap();
        let near_params = near.pagination_params(0);
        let far_params = far.pagination_params(0);
        let near_alt = format!("!1d{}!", near.altitude());
        let far_alt = format!("!1d{}!", far.altitude());
        assert_eq!(near_params.replacen(&near_alt, &far_alt, 1), far_params);
    }

    #[test]
    fn template_tail_is_unchanged() {
        assert_eq!(TEMPLATE_TAIL.len(), 1233);
        assert!(TEMPLATE_TAIL.starts_with("!10b1!12m25!1m1!18b1"));
        assert!(TEMPLATE_TAIL.contains("!74i150000!"));
    }
}
