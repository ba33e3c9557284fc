use serde::{Deserialize, Serialize};

/// Web Mercator, the map view's native spatial reference.
pub const WEB_MERCATOR_WKID: u32 = 3857;
/// WGS84 geographic coordinates.
pub const WGS84_WKID: u32 = 4326;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpatialReference {
    pub wkid: u32,
}

impl SpatialReference {
    pub const fn new(wkid: u32) -> Self {
        Self { wkid }
    }

    pub const fn web_mercator() -> Self {
        Self::new(WEB_MERCATOR_WKID)
    }

    pub const fn wgs84() -> Self {
        Self::new(WGS84_WKID)
    }
}

impl Default for SpatialReference {
    fn default() -> Self {
        Self::web_mercator()
    }
}

/// Axis-aligned rectangle in a named coordinate system.
///
/// Captured from the map view on every extent change and never mutated
/// afterwards; a new view produces a new extent.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoExtent {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
    #[serde(default)]
    pub spatial_reference: SpatialReference,
}

impl GeoExtent {
    pub fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
            spatial_reference: SpatialReference::default(),
        }
    }

    pub fn with_spatial_reference(mut self, spatial_reference: SpatialReference) -> Self {
        self.spatial_reference = spatial_reference;
        self
    }

    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    pub fn center(&self) -> (f64, f64) {
        (
            0.5 * (self.xmin + self.xmax),
            0.5 * (self.ymin + self.ymax),
        )
    }

    /// Parses `xmin,ymin,xmax,ymax`.
    pub fn parse_bbox(s: &str) -> Result<Self, String> {
        let parts: Vec<_> = s.split(',').collect();
        if parts.len() != 4 {
            return Err("extent must be xmin,ymin,xmax,ymax".to_string());
        }
        let mut vals = [0.0f64; 4];
        for (slot, part) in vals.iter_mut().zip(&parts) {
            *slot = part
                .trim()
                .parse()
                .map_err(|e| format!("invalid extent value {part:?}: {e}"))?;
        }
        Ok(Self::new(vals[0], vals[1], vals[2], vals[3]))
    }
}

#[cfg(test)]
mod tests {
    use super::{GeoExtent, SpatialReference, WEB_MERCATOR_WKID};

    #[test]
    fn parse_bbox_reads_four_values() {
        let e = GeoExtent::parse_bbox("-59.5, 46.5,-52.5,51.5").unwrap();
        assert_eq!(e.xmin, -59.5);
        assert_eq!(e.ymax, 51.5);
        assert_eq!(e.spatial_reference.wkid, WEB_MERCATOR_WKID);
    }

    #[test]
    fn parse_bbox_rejects_wrong_arity() {
        assert!(GeoExtent::parse_bbox("1,2,3").is_err());
        assert!(GeoExtent::parse_bbox("1,2,x,4").is_err());
    }

    #[test]
    fn missing_spatial_reference_defaults_to_web_mercator() {
        let e: GeoExtent =
            serde_json::from_str(r#"{"xmin":0,"ymin":1,"xmax":2,"ymax":3}"#).unwrap();
        assert_eq!(e.spatial_reference, SpatialReference::web_mercator());
        assert_eq!(e.center(), (1.0, 2.0));
    }
}
