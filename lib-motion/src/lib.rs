pub use math::{EulerAngles, Matrix3, Quaternion, Vector};

pub mod error;
pub use error::*;

pub mod config;
pub use config::*;

pub mod permission;
pub use permission::*;

pub mod sample;
pub use sample::*;

pub mod tracker;
pub use tracker::*;

pub mod artifacts;
pub use artifacts::*;

pub mod recording;
pub use recording::*;

#[cfg(test)]
mod tests;
