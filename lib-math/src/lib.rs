#![cfg_attr(not(test), no_std)]

pub mod float_utils;
pub use float_utils::*;

pub mod euler_angles;
pub use euler_angles::*;

pub mod vector;
pub use vector::*;

pub mod quaternion;
pub use quaternion::*;

pub mod matrix;
pub use matrix::*;


pub const RAD_TO_DEG: f64 = 57.29577951308232;
