#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::doc_markdown)]
//! Core types and traits for the percentgrid layout engine.
//!
//! This crate provides the foundations shared by the layout crates:
//! - Measurement units: [`Unit`], [`NumberWithUnit`]
//! - Integer geometry: [`Size`], [`Rect`], [`Insets`]
//! - Toolkit collaborators: [`PlatformAdapter`], [`UnitSizeHandler`]
//! - Errors: [`LayoutError`]

mod error;
mod geometry;
mod platform;
mod unit;

pub use error::{LayoutError, Result};
pub use geometry::{Insets, Rect, Size};
pub use platform::{
    ComponentId, ComponentSizes, FixedPlatform, FixedSizeHandler, PlatformAdapter,
    UnitSizeHandler,
};
pub use unit::{NumberWithUnit, Unit};
