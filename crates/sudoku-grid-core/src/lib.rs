//! Core types and utilities for Sudoku grid detection.
//!
//! This crate is small and purely geometric: line segments, grayscale image
//! buffers, homographies and a perspective warp. It does not depend on any
//! concrete edge or line detector.

mod geometry;
mod homography;
mod image;
mod logger;

pub use geometry::{cross3, quad_is_degenerate, LineSegment, Point2D};
pub use homography::{homography_from_4pt, warp_perspective_gray, Homography};
pub use image::{sample_bilinear, sample_bilinear_u8, GrayImage, GrayImageView};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_from_env, init_with_level, LOG_ENV_VAR};

pub use nalgebra::Point2;
