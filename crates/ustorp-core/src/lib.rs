//! `ustorp-core` prepares the data behind the Ustorp restoration map.
//!
//! This crate includes:
//! - **Reprojection**: SWEREF99 TM to WGS84 for every GeoJSON geometry type.
//! - **Management plans**: a forgiving parser for the Swedish plan exports.
//! - **Label placement**: vertex centroids of habitat polygons.
//! - **Styling**: the Nvklass colour scale, layer styles and popup text.
//! - **Site loading**: fetching the map documents, degrading layer by layer.
//!
//! The transformations are pure and synchronous; only the [`site`] loader
//! and the [`source`] seam it fetches through are async.

pub mod centroid;
pub mod config;
pub mod error;
pub mod plan;
pub mod properties;
pub mod reproject;
pub mod site;
pub mod source;
pub mod style;
pub mod types;
