//! Common utilities and types for the replanning core
pub mod error;
pub mod types;

pub use self::error::*;
pub use self::types::*;

/// Normalize an angle to [-pi, pi]
pub fn normalize_angle(angle: f64) -> f64 {
    let two_pi = 2.0 * std::f64::consts::PI;
    let wrapped = (angle + std::f64::consts::PI).rem_euclid(two_pi) - std::f64::consts::PI;
    if wrapped == -std::f64::consts::PI {
        std::f64::consts::PI
    } else {
        wrapped
    }
}
