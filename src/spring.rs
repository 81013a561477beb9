use crate::constants::{
    CARD_SPRING_DAMPING_RATIO, CARD_SPRING_STIFFNESS, PULSE_SPRING_DAMPING_RATIO,
    PULSE_SPRING_STIFFNESS, SPRING_MAX_SUBSTEP_SEC, TILT_SPRING_DAMPING_RATIO,
    TILT_SPRING_STIFFNESS,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringProfile {
    pub stiffness: f32,
    pub damping_ratio: f32,
}

impl SpringProfile {
    /// Low stiffness, slightly under-damped: overshoots once then settles.
    pub const TILT: Self = Self {
        stiffness: TILT_SPRING_STIFFNESS,
        damping_ratio: TILT_SPRING_DAMPING_RATIO,
    };
    pub const CARD: Self = Self {
        stiffness: CARD_SPRING_STIFFNESS,
        damping_ratio: CARD_SPRING_DAMPING_RATIO,
    };
    pub const PULSE: Self = Self {
        stiffness: PULSE_SPRING_STIFFNESS,
        damping_ratio: PULSE_SPRING_DAMPING_RATIO,
    };
}

/// Scalar damped spring integrated with semi-implicit Euler.
#[derive(Clone, Copy, Debug)]
pub struct Spring {
    pub profile: SpringProfile,
    pub value: f32,
    pub velocity: f32,
}

impl Spring {
    pub fn new(profile: SpringProfile, value: f32) -> Self {
        Self {
            profile,
            value,
            velocity: 0.0,
        }
    }

    /// Advance toward `target`. Large `dt` is split into fixed sub-steps so a
    /// stalled frame cannot blow the integrator up.
    pub fn step(&mut self, target: f32, dt_sec: f32) -> f32 {
        if dt_sec.is_nan() || dt_sec <= 0.0 || !target.is_finite() {
            return self.value;
        }
        let omega = self.profile.stiffness.sqrt();
        let k = omega * omega;
        let c = 2.0 * omega * self.profile.damping_ratio;
        let steps = (dt_sec / SPRING_MAX_SUBSTEP_SEC).ceil().max(1.0) as u32;
        let h = dt_sec / steps as f32;
        for _ in 0..steps {
            let accel = k * (target - self.value) - c * self.velocity;
            self.velocity += accel * h;
            self.value += self.velocity * h;
        }
        self.value
    }

    pub fn is_settled(&self, target: f32, epsilon: f32) -> bool {
        (self.value - target).abs() < epsilon && self.velocity.abs() < epsilon
    }
}
