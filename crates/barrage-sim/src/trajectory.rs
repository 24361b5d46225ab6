//! Trajectory math: straight-line and ballistic flight.
//!
//! Pure functions over integer world units and millisecond game time.
//! Floating point is confined to square roots and trigonometry whose
//! results are truncated straight back to integers.

use glam::I64Vec3;

use barrage_core::constants::*;
use barrage_core::enums::HitSide;
use barrage_core::types::{isqrt, Position};

/// Position of a straight-line round after `elapsed_ms` of flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectStep {
    pub pos: Position,
    /// Distance flown so far.
    pub travelled: i64,
    /// Horizontal launch-to-aim distance, at least 1.
    pub path_len: i64,
    /// Full launch-to-aim displacement.
    pub displacement: I64Vec3,
}

pub fn direct_step(start: Position, aim: Position, elapsed_ms: i64, speed: i32) -> DirectStep {
    let displacement = aim.as_i64vec3() - start.as_i64vec3();
    let horizontal = isqrt(displacement.x * displacement.x + displacement.y * displacement.y);
    let path_len = horizontal.max(1);
    let travelled = elapsed_ms * i64::from(speed) / GAME_TICKS_PER_SEC;
    // A vertical shot sits on its aim point.
    let pos = if horizontal == 0 {
        aim
    } else {
        Position::from_i64vec3(start.as_i64vec3() + displacement * travelled / path_len)
    };
    DirectStep {
        pos,
        travelled,
        path_len,
        displacement,
    }
}

/// True once `travelled` exceeds `percent` of `path_len`.
pub fn past_lifetime(travelled: i64, path_len: i64, percent: i64) -> bool {
    travelled * 100 > path_len * percent
}

/// Point `percent` of the way along a displacement from `start`.
pub fn extend(start: Position, displacement: I64Vec3, percent: i64) -> Position {
    Position::from_i64vec3(start.as_i64vec3() + displacement * percent / 100)
}

/// Launch solution for a ballistic shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BallisticSolution {
    /// Launch pitch, whole degrees.
    pub pitch: i32,
    /// Muzzle speed actually used. Above the weapon's speed when boosted.
    pub speed: i32,
    pub v_xy: i32,
    pub v_z: i32,
}

fn whole_degrees(radians: f64) -> i32 {
    radians.to_degrees() as i32
}

/// Solve the launch pitch for a horizontal `range` and height change `dz`.
///
/// Of the two pitches that land on target, the flatter one wins unless it
/// is not above the horizon. Out-of-reach targets are engaged at
/// `PROJ_MAX_PITCH_DEG` with a boosted speed. Returns `None` when no arc
/// exists (zero range, or a target too steep for the maximum pitch).
pub fn solve_ballistic(range: i64, dz: i64, speed: i32, gravity: i32) -> Option<BallisticSolution> {
    if range <= 0 || speed <= 0 || gravity <= 0 {
        return None;
    }
    let r = range as f64;
    let dz = dz as f64;
    let g = f64::from(gravity);
    let v = f64::from(speed);

    let a = g * r * r / (2.0 * v * v);
    let c = 4.0 * a * (dz + a);
    let s = r * r - c;

    let (pitch, launch_speed) = if s < 0.0 {
        // Out of reach at base speed.
        let pitch = PROJ_MAX_PITCH_DEG;
        let tan = f64::from(pitch).to_radians().tan();
        let denom = 2.0 * (r * tan - dz);
        if denom <= 0.0 {
            return None;
        }
        let boosted = (g * (1.0 + tan * tan) / denom * r * r).sqrt();
        (pitch, boosted as i32)
    } else {
        let root = s.sqrt();
        let first = whole_degrees((r + root).atan2(2.0 * a));
        let second = whole_degrees((r - root).atan2(2.0 * a));
        let (low, high) = if first <= second {
            (first, second)
        } else {
            (second, first)
        };
        (if low > 0 { low } else { high }, speed)
    };

    let radians = f64::from(pitch).to_radians();
    Some(BallisticSolution {
        pitch,
        speed: launch_speed,
        v_xy: (f64::from(launch_speed) * radians.cos()) as i32,
        v_z: (f64::from(launch_speed) * radians.sin()) as i32,
    })
}

/// Position of a ballistic round after `elapsed_ms` of flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BallisticStep {
    pub pos: Position,
    /// Horizontal distance flown.
    pub distance: i64,
    /// Current pitch, whole degrees.
    pub pitch: i32,
    /// Whether the round is on its way down.
    pub descending: bool,
}

pub fn ballistic_step(
    start: Position,
    aim: Position,
    range: i64,
    v_xy: i32,
    v_z: i32,
    elapsed_ms: i64,
    gravity: i32,
) -> BallisticStep {
    let t = elapsed_ms;
    let g = i64::from(gravity);
    let distance = t * i64::from(v_xy) / GAME_TICKS_PER_SEC;
    let range = range.max(1);
    let dx = i64::from(aim.x) - i64::from(start.x);
    let dy = i64::from(aim.y) - i64::from(start.y);

    let vertical = i64::from(v_z) - t * g / GAME_TICKS_PER_SEC;
    let z = i64::from(start.z)
        + (i64::from(v_z) - t * g / GAME_TICKS_PER_SEC / 2) * t / GAME_TICKS_PER_SEC;

    let pos = Position::from_i64vec3(I64Vec3::new(
        i64::from(start.x) + distance * dx / range,
        i64::from(start.y) + distance * dy / range,
        z,
    ));
    BallisticStep {
        pos,
        distance,
        pitch: whole_degrees((vertical as f64).atan2(f64::from(v_xy))),
        descending: vertical < 0,
    }
}

/// Horizontal distance past which a ballistic round is forced down.
pub fn ballistic_lifetime_radius(range: i64) -> i64 {
    range * INDIRECT_EXTENSION_PERCENT / 100
}

/// Whether a point lies inside a hitbox standing at `base`.
pub fn in_hitbox(point: &Position, base: &Position, radius: i32, height: i32) -> bool {
    let dz = (i64::from(point.z) - i64::from(base.z)).abs();
    let radius = i64::from(radius);
    dz < i64::from(height) && point.horizontal_range_sq(base) < radius * radius
}

/// Which side of a target a round launched from `launch` strikes.
///
/// `alt_change` is the launch-to-aim height change and `round_z` the
/// round's height when it connects.
pub fn hit_side(
    launch: &Position,
    alt_change: i32,
    round_z: i32,
    target: &Position,
    facing: i32,
) -> HitSide {
    if alt_change > HIT_SIDE_TOP_ALT_CHANGE {
        return HitSide::Top;
    }
    if round_z < target.z - HIT_SIDE_BOTTOM_MARGIN {
        return HitSide::Bottom;
    }
    let dx = f64::from(launch.x - target.x);
    let dy = f64::from(launch.y - target.y);
    let bearing = whole_degrees(dx.atan2(dy));
    match (bearing - facing).rem_euclid(360) {
        45..=134 => HitSide::Right,
        135..=224 => HitSide::Rear,
        225..=314 => HitSide::Left,
        _ => HitSide::Front,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_step_interpolates() {
        let start = Position::new(0, 0, 10);
        let aim = Position::new(1000, 0, 30);
        let step = direct_step(start, aim, 500, 1000);
        assert_eq!(step.travelled, 500);
        assert_eq!(step.path_len, 1000);
        assert_eq!(step.pos, Position::new(500, 0, 20));
    }

    #[test]
    fn direct_step_zero_length_path() {
        let p = Position::new(50, 50, 0);
        let step = direct_step(p, p, 100, 1000);
        assert_eq!(step.path_len, 1);
        assert_eq!(step.pos, p);

        let overhead = Position::new(50, 50, 7);
        let step = direct_step(p, overhead, 8000, 1000);
        assert_eq!(step.pos, overhead);
    }

    #[test]
    fn lifetime_threshold_is_strict() {
        assert!(!past_lifetime(150, 100, 150));
        assert!(past_lifetime(151, 100, 150));
    }

    #[test]
    fn ballistic_prefers_flatter_pitch() {
        let sol = solve_ballistic(2000, 0, 500, 100).unwrap();
        assert_eq!(sol.pitch, 26, "flat solution is 26.5 deg, steep is 63.4 deg");
        assert_eq!(sol.speed, 500);
        assert_eq!(sol.v_xy, 449);
        assert_eq!(sol.v_z, 219);
    }

    #[test]
    fn ballistic_uses_steep_pitch_when_flat_is_not_upward() {
        let sol = solve_ballistic(1000, -1000, 500, 100).unwrap();
        assert_eq!(sol.pitch, 80);
    }

    #[test]
    fn ballistic_out_of_reach_boosts_speed() {
        // At 1000 u/s² a 500 u/s round reaches only 250 units.
        let sol = solve_ballistic(2000, 0, 500, ACC_GRAVITY).unwrap();
        assert_eq!(sol.pitch, PROJ_MAX_PITCH_DEG);
        assert!(sol.speed > 500);
        assert_eq!(sol.speed, 1519);
    }

    #[test]
    fn ballistic_degenerate_cases() {
        assert_eq!(solve_ballistic(0, 0, 500, 100), None);
        // Too steep for the maximum pitch.
        assert_eq!(solve_ballistic(100, 5000, 10, 1000), None);
    }

    #[test]
    fn ballistic_lands_near_target() {
        let sol = solve_ballistic(2000, 0, 500, 100).unwrap();
        let start = Position::new(0, 0, 0);
        let aim = Position::new(2000, 0, 0);
        // Nominal flight time: range / horizontal speed.
        let flight_ms = 2000 * 1000 / i64::from(sol.v_xy);
        let step = ballistic_step(start, aim, 2000, sol.v_xy, sol.v_z, flight_ms, 100);
        assert!((step.pos.x - 2000).abs() <= 2);
        assert!(step.pos.z.abs() <= 20, "z = {}", step.pos.z);
        assert!(step.descending);

        let apex = ballistic_step(start, aim, 2000, sol.v_xy, sol.v_z, 1000, 100);
        assert!(apex.pos.z > 0);
        assert!(apex.pitch > 0);
    }

    #[test]
    fn lifetime_radius_extends_range() {
        assert_eq!(ballistic_lifetime_radius(1000), 1200);
    }

    #[test]
    fn hitbox_test() {
        let base = Position::new(0, 0, 0);
        assert!(in_hitbox(&Position::new(10, 10, 20), &base, 32, 40));
        assert!(!in_hitbox(&Position::new(32, 0, 20), &base, 32, 40), "edge is outside");
        assert!(!in_hitbox(&Position::new(0, 0, 40), &base, 32, 40));
    }

    #[test]
    fn hit_sides() {
        let target = Position::new(0, 0, 0);
        assert_eq!(hit_side(&Position::new(0, 100, 0), 0, 0, &target, 0), HitSide::Front);
        assert_eq!(hit_side(&Position::new(100, 0, 0), 0, 0, &target, 0), HitSide::Right);
        assert_eq!(hit_side(&Position::new(0, -100, 0), 0, 0, &target, 0), HitSide::Rear);
        assert_eq!(hit_side(&Position::new(-100, 0, 0), 0, 0, &target, 0), HitSide::Left);
        // Facing rotates the sides.
        assert_eq!(hit_side(&Position::new(100, 0, 0), 0, 0, &target, 90), HitSide::Front);
        assert_eq!(hit_side(&Position::new(0, 100, 0), 400, 0, &target, 0), HitSide::Top);
        assert_eq!(hit_side(&Position::new(0, 100, 0), 0, -60, &target, 0), HitSide::Bottom);
    }
}
