/*
    Argus, attitude program planning for agile Earth observation
    Copyright (C) 2024 The Argus Developers

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU Affero General Public License for more details.

    You should have received a copy of the GNU Affero General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

use nalgebra::Vector3;
use std::f64::consts::TAU;

/// Returns the provided angle bounded between 0.0 and 360.0
pub fn between_0_360(angle: f64) -> f64 {
    let mut bounded = angle;
    while bounded > 360.0 {
        bounded -= 360.0;
    }
    while bounded < 0.0 {
        bounded += 360.0;
    }
    bounded
}

/// Returns the provided angle bounded between -180.0 and +180.0
pub fn between_pm_180(angle: f64) -> f64 {
    let mut bounded = angle;
    while bounded > 180.0 {
        bounded -= 360.0;
    }
    while bounded < -180.0 {
        bounded += 360.0;
    }
    bounded
}

/// Returns the provided angle in radians bounded between 0 and 2π
pub fn between_0_tau(angle: f64) -> f64 {
    let mut bounded = angle % TAU;
    if bounded < 0.0 {
        bounded += TAU;
    }
    bounded
}

/// Returns the angle in radians between two vectors, in [0, π].
///
/// The dot product is clamped before the acos to absorb rounding just outside
/// of the [-1, 1] domain.
pub fn angle_between(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    let denom = a.norm() * b.norm();
    if denom < f64::EPSILON {
        return 0.0;
    }
    (a.dot(b) / denom).clamp(-1.0, 1.0).acos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn angle_bounding() {
        assert_abs_diff_eq!(between_0_360(-90.0), 270.0);
        assert_abs_diff_eq!(between_0_360(720.5), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(between_pm_180(270.0), -90.0);
        assert_abs_diff_eq!(between_0_tau(-PI), PI, epsilon = 1e-12);
    }

    #[test]
    fn vector_angles() {
        let x = Vector3::new(1.0, 0.0, 0.0);
        let y = Vector3::new(0.0, 2.0, 0.0);
        assert_abs_diff_eq!(angle_between(&x, &y), FRAC_PI_2, epsilon = 1e-12);
        assert_abs_diff_eq!(angle_between(&x, &(-x)), PI, epsilon = 1e-12);
        assert_abs_diff_eq!(angle_between(&x, &x), 0.0, epsilon = 1e-12);
    }
}
