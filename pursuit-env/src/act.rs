//! Actions of [`PursuitEnv`](crate::PursuitEnv).
use pursuit_core::Act;
use serde::{Deserialize, Serialize};

/// Action of a single agent.
///
/// The movement components lie in `[-1, 1]`; out-of-range values are clamped and
/// NaN is read as zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PursuitAct {
    /// Control signal along x.
    pub move_x: f32,

    /// Control signal along z.
    pub move_z: f32,

    /// Jump request.
    pub jump: bool,
}

fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(-1.0, 1.0)
    }
}

impl PursuitAct {
    /// Constructs an action, clamping the movement components.
    pub fn new(move_x: f32, move_z: f32, jump: bool) -> Self {
        Self {
            move_x: clamp_unit(move_x),
            move_z: clamp_unit(move_z),
            jump,
        }
    }

    /// An action that neither moves nor jumps.
    pub fn idle() -> Self {
        Self::default()
    }

    /// Constructs an action from the raw buffers of a trainer: two continuous values
    /// and one discrete branch where `1` means jump.
    ///
    /// Missing entries are read as zero.
    pub fn from_buffers(continuous: &[f32], discrete: &[i32]) -> Self {
        let get = |i: usize| continuous.get(i).copied().unwrap_or(0.0);
        Self::new(get(0), get(1), discrete.first() == Some(&1))
    }
}

impl From<[f32; 3]> for PursuitAct {
    /// `[move_x, move_z, jump]`, where `jump > 0.5` means jump.
    fn from(v: [f32; 3]) -> Self {
        Self::new(v[0], v[1], v[2] > 0.5)
    }
}

/// Actions of both agents for one decision step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PursuitJointAct {
    /// Action of the chaser.
    pub chaser: PursuitAct,

    /// Action of the runner.
    pub runner: PursuitAct,
}

impl PursuitJointAct {
    /// Constructs a joint action.
    pub fn new(chaser: PursuitAct, runner: PursuitAct) -> Self {
        Self { chaser, runner }
    }
}

impl Act for PursuitJointAct {
    fn len(&self) -> usize {
        2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp() {
        let a = PursuitAct::new(2.0, f32::NAN, false);
        assert_eq!(a.move_x, 1.0);
        assert_eq!(a.move_z, 0.0);
        assert_eq!(PursuitAct::new(-3.0, 0.25, true).move_x, -1.0);
    }

    #[test]
    fn test_from_buffers() {
        assert_eq!(
            PursuitAct::from_buffers(&[0.5, -0.5], &[1]),
            PursuitAct::new(0.5, -0.5, true)
        );
        assert_eq!(PursuitAct::from_buffers(&[0.5], &[]), PursuitAct::new(0.5, 0.0, false));
    }
}
