//! Directional lighting for the lit shader.

use glam::Vec3;

use crate::{
    abs::{ShaderProgram, UniformSlot},
    config::LightConfig,
};

/// A directional light. Plain value, copied into uniforms each time it is applied.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Light {
    pub direction: Vec3,
    pub color: Vec3,
}

impl Light {
    /// `direction` is normalized; a zero vector stays zero.
    pub fn new(direction: Vec3, color: Vec3) -> Self {
        Self {
            direction: direction.normalize_or_zero(),
            color,
        }
    }

    pub fn apply(
        &self,
        program: &ShaderProgram,
        color_slot: impl UniformSlot,
        direction_slot: impl UniformSlot,
    ) {
        program.set_uniform(color_slot, self.color);
        program.set_uniform(direction_slot, self.direction);
    }
}

impl From<&LightConfig> for Light {
    fn from(config: &LightConfig) -> Self {
        Self::new(Vec3::from(config.direction), Vec3::from(config.color))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_is_normalized() {
        let light = Light::new(Vec3::new(-3.0, 0.0, 4.0), Vec3::ONE);
        assert!((light.direction.length() - 1.0).abs() < 1e-6);
        assert!(light.direction.abs_diff_eq(Vec3::new(-0.6, 0.0, 0.8), 1e-6));
    }

    #[test]
    fn zero_direction_stays_zero() {
        assert_eq!(Light::new(Vec3::ZERO, Vec3::ONE).direction, Vec3::ZERO);
    }

    #[test]
    fn built_from_config() {
        let light = Light::from(&LightConfig::default());
        assert_eq!(light.direction, Vec3::NEG_X);
        assert_eq!(light.color, Vec3::ONE);
    }
}
