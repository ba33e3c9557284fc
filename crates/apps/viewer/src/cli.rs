use std::num::NonZeroU32;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use foundation::extent::{GeoExtent, SpatialReference};

use crate::config::{ConfigError, ViewerConfig};
use crate::error::ViewerError;

#[derive(Parser, Debug)]
#[command(author, version, about = "Elevation and weather scene builder for a map view")]
pub struct Args {
    /// Elevation endpoint (overrides ELEVATION_URL)
    #[arg(long, global = true)]
    pub elevation_url: Option<String>,

    /// Lattice cells per axis (overrides ELEVATION_RESOLUTION)
    #[arg(long, global = true)]
    pub resolution: Option<u32>,

    /// Catalog JSON file (overrides CATALOG_PATH)
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sample an extent once and print the grid as JSON
    Sample {
        /// Extent: xmin,ymin,xmax,ymax
        #[arg(long, allow_hyphen_values = true)]
        extent: String,

        /// Spatial reference of the extent
        #[arg(long)]
        wkid: Option<u32>,
    },

    /// Compose one scene frame and print it as JSON
    Scene {
        /// Extent: xmin,ymin,xmax,ymax
        #[arg(long, allow_hyphen_values = true)]
        extent: String,

        #[arg(long)]
        wkid: Option<u32>,

        /// Selected source id (repeatable; default selection when absent)
        #[arg(long = "source")]
        sources: Vec<String>,

        /// Frame time in seconds
        #[arg(long, default_value_t = 0.0)]
        time: f64,

        /// Fetch the latest weather observation
        #[arg(long)]
        weather: bool,

        #[arg(long)]
        wireframe: bool,
    },

    /// Print the sidebar view model
    Catalog {
        /// Toggle a source (repeatable)
        #[arg(long)]
        toggle: Vec<String>,

        /// Toggle a category's expansion (repeatable)
        #[arg(long)]
        collapse: Vec<String>,

        /// Close the sidebar
        #[arg(long)]
        close: bool,
    },

    /// Read view events as JSON lines on stdin and print published states
    Watch {
        /// Selected source id (repeatable; default selection when absent)
        #[arg(long = "source")]
        sources: Vec<String>,
    },
}

impl Args {
    /// Applies the flags that override environment settings.
    pub fn apply(&self, config: &mut ViewerConfig) -> Result<(), ConfigError> {
        if let Some(url) = &self.elevation_url {
            config.elevation_url = url.clone();
        }
        if let Some(r) = self.resolution {
            config.resolution = NonZeroU32::new(r).ok_or(ConfigError::Zero("--resolution"))?;
        }
        if let Some(path) = &self.catalog {
            config.catalog_path = Some(path.clone());
        }
        Ok(())
    }
}

pub fn parse_extent(raw: &str, wkid: Option<u32>) -> Result<GeoExtent, ViewerError> {
    let extent = GeoExtent::parse_bbox(raw).map_err(ViewerError::InvalidArgument)?;
    Ok(match wkid {
        Some(wkid) => extent.with_spatial_reference(SpatialReference::new(wkid)),
        None => extent,
    })
}
