//! Core types for cave generation and navigation.
//!
//! This crate provides the foundational types shared across the *cavenav*
//! crates: discrete cell geometry ([`Point`], [`Range`]), continuous world
//! positions ([`Vec2`]) and a dense row-major [`Grid`].

pub mod geom;
pub mod grid;

pub use geom::{Point, Range, RangeIter, Vec2, normalize_deg};
pub use grid::Grid;
