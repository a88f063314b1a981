//! Spatial indexing for node neighborhood queries.
//!
//! This module provides an R-tree based spatial index used by overlap
//! detection, density scoring, and new-node placement.

mod rtree;

pub use rtree::SpatialIndex;
