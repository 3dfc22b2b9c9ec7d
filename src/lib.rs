//! # qirust-modules
//!
//! Turns a rendered QR code into three consumable views of the same symbol.
//!
//! A [`SymbolGenerator`] renders the payload into a raw raster: one pixel per module plus a
//! 1-module light quiet zone. [`ModuleExtractor`] then walks that raster once and produces a
//! [`ModuleInfo`] holding:
//!
//! - a row-major boolean module matrix (`true` = dark), read with [`ModuleInfo::get`];
//! - the raster with the quiet zone cropped off;
//! - a [`VectorPath`] of one rectangle per dark module, scaled into the unit square so it can
//!   be drawn at any size.
//!
//! The crate ships a pure Rust generator ([`QrGenerator`], backed by [`qrcode::QrCode`]); any
//! other encoder can be plugged in by implementing [`SymbolGenerator`].
//!
//! ## Example
//!
//! ```rust
//! use qirust_modules::{construct, CorrectionLevel, Error};
//!
//! let info = construct("HELLO", CorrectionLevel::Medium).unwrap();
//! assert_eq!(info.rows(), 21);
//! assert_eq!(info.image().dimensions(), (21, 21));
//! assert_eq!(info.path().len(), info.dark_count());
//!
//! assert!(matches!(construct("", CorrectionLevel::Medium), Err(Error::EmptyValue)));
//! ```
//!
//! ## Modules
//!
//! - [`extract`]: Validation and the raster to matrix/path extraction.
//! - [`generator`]: The [`SymbolGenerator`] seam and the built-in generator.
//! - [`qrcode`]: QR Code Model 2 encoder behind the built-in generator.
//! - [`path`]: Normalized vector path types.
//! - [`helper`]: SVG and text exports.

#![forbid(unsafe_code)]

pub mod error;
pub mod extract;
pub mod generator;
pub mod helper;
pub mod modules;
pub mod path;
pub mod qrcode;

pub use error::{Error, Result};
pub use extract::{construct, validate, DarkThreshold, ExtractorOptions, ModuleExtractor};
pub use generator::{GeneratorError, QrGenerator, RawRaster, SymbolGenerator};
pub use modules::ModuleInfo;
pub use path::{UnitRect, VectorPath};
pub use qrcode::CorrectionLevel;
