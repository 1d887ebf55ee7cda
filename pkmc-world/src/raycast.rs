use pkmc_util::Vec3;

use crate::error::RaycastError;
use crate::world::World;

/// Integer 0..5 identifying which face of a cube the ray crossed last, per
/// `-Y=0, +Y=1, -Z=2, +Z=3, -X=4, +X=5`.
pub type Face = u8;

pub const FACE_BOTTOM: Face = 0;
pub const FACE_TOP: Face = 1;
pub const FACE_NORTH: Face = 2;
pub const FACE_SOUTH: Face = 3;
pub const FACE_WEST: Face = 4;
pub const FACE_EAST: Face = 5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub position: (i32, i32, i32),
    pub face: Face,
    pub intersect_point: Vec3<f64>,
    pub state_id: u32,
}

const TIE_EPSILON: f64 = 1e-9;

/// Voxel-grid DDA (Amanatides-Woo). Steps `voxel` one cell at a time along
/// whichever axis has the smallest `tMax`, stopping at the first non-air
/// block not excluded by `ignore`, or when the accumulated distance
/// exceeds `max_distance`.
pub fn raycast(
    world: &World,
    origin: Vec3<f64>,
    direction: Vec3<f64>,
    max_distance: f64,
    ignore: Option<&dyn Fn(u32) -> bool>,
) -> Result<Option<Hit>, RaycastError> {
    if direction.is_zero() {
        return Err(RaycastError::ZeroDirection);
    }
    if max_distance < 0.0 {
        return Err(RaycastError::NegativeMaxDistance(max_distance));
    }

    let dir = direction.normalized();
    if dir.is_zero() {
        return Err(RaycastError::ZeroDirection);
    }

    let mut voxel = (
        origin.x.floor() as i32,
        origin.y.floor() as i32,
        origin.z.floor() as i32,
    );

    let step = (
        axis_step(dir.x),
        axis_step(dir.y),
        axis_step(dir.z),
    );
    let t_delta = (
        axis_t_delta(dir.x),
        axis_t_delta(dir.y),
        axis_t_delta(dir.z),
    );
    let mut t_max = (
        axis_t_max(origin.x, dir.x, voxel.0),
        axis_t_max(origin.y, dir.y, voxel.1),
        axis_t_max(origin.z, dir.z, voxel.2),
    );

    // If the ray already starts inside solid geometry, report it using the
    // face/distance the first DDA step would have produced, without
    // actually moving off the origin voxel.
    let starting_state_id = world.get_block_state_id(voxel.0, voxel.1, voxel.2);
    if starting_state_id != 0 && !ignore.is_some_and(|predicate| predicate(starting_state_id)) {
        let (axis, t_hit) = select_axis(t_max);
        if t_hit <= max_distance {
            let face = match axis {
                0 if step.0 > 0 => FACE_WEST,
                0 => FACE_EAST,
                1 if step.1 > 0 => FACE_BOTTOM,
                1 => FACE_TOP,
                _ if step.2 > 0 => FACE_NORTH,
                _ => FACE_SOUTH,
            };
            return Ok(Some(Hit {
                position: voxel,
                face,
                intersect_point: origin + dir * t_hit,
                state_id: starting_state_id,
            }));
        }
    }

    loop {
        let (axis, t_hit) = select_axis(t_max);

        if t_hit > max_distance {
            return Ok(None);
        }

        let face = match axis {
            0 => {
                voxel.0 += step.0;
                t_max.0 += t_delta.0;
                if step.0 > 0 {
                    FACE_WEST
                } else {
                    FACE_EAST
                }
            }
            1 => {
                voxel.1 += step.1;
                t_max.1 += t_delta.1;
                if step.1 > 0 {
                    FACE_BOTTOM
                } else {
                    FACE_TOP
                }
            }
            _ => {
                voxel.2 += step.2;
                t_max.2 += t_delta.2;
                if step.2 > 0 {
                    FACE_NORTH
                } else {
                    FACE_SOUTH
                }
            }
        };

        let state_id = world.get_block_state_id(voxel.0, voxel.1, voxel.2);
        if state_id != 0 && !ignore.is_some_and(|predicate| predicate(state_id)) {
            let intersect_point = origin + dir * t_hit;
            return Ok(Some(Hit {
                position: voxel,
                face,
                intersect_point,
                state_id,
            }));
        }
    }
}

/// Picks the axis with the smallest `tMax`, tie-breaking X, then Y, then Z.
fn select_axis(t_max: (f64, f64, f64)) -> (u8, f64) {
    if t_max.0 <= t_max.1 + TIE_EPSILON && t_max.0 <= t_max.2 + TIE_EPSILON {
        (0, t_max.0)
    } else if t_max.1 <= t_max.2 + TIE_EPSILON {
        (1, t_max.1)
    } else {
        (2, t_max.2)
    }
}

fn axis_step(d: f64) -> i32 {
    if d > 0.0 {
        1
    } else if d < 0.0 {
        -1
    } else {
        0
    }
}

fn axis_t_delta(d: f64) -> f64 {
    if d == 0.0 {
        f64::INFINITY
    } else {
        1.0 / d.abs()
    }
}

fn axis_t_max(origin: f64, d: f64, voxel: i32) -> f64 {
    if d > 0.0 {
        ((voxel as f64 + 1.0) - origin) / d
    } else if d < 0.0 {
        (voxel as f64 - origin) / d
    } else {
        f64::INFINITY
    }
}
