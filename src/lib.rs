//! Crop box computation from size bounds, aspect ratio, and auto-crop area.
//!
//! Pure geometry with no pixel operations, `no_std` compatible. The caller
//! supplies the decoded image size and performs the actual crop.
//!
//! # Modules
//!
//! - [`crop`]: Size constraints, bounds, crop box resolution and errors
//! - [`ratio`]: GCD reduction and lenient `W:H` aspect ratio parsing
//! - [`strategy`]: Crop strategies (native, aspect fit) behind one trait
//! - [`config`]: Configuration string parsing (feature `config`)

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod crop;
pub mod ratio;
pub mod strategy;

#[cfg(feature = "config")]
pub mod config;

// Re-exports: core types from crop module
pub use crop::{
    Bounds, CropBox, CropError, Gravity, Infeasible, OriginalImage, SizeConstraints, resolve,
    resolve_crop_box,
};
pub use ratio::{AspectRatio, AspectRatioSpec, gcd};
pub use strategy::{AspectFit, Authority, CropStrategy, Native, Strategy};
