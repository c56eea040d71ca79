//! Uniform binding tables.
//!
//! Each bundled program declares its uniforms with an explicit
//! `layout (location = N)`. The enums here are the host-side half of that
//! agreement, one per program.

use crate::abs::UniformSlot;

/// Slots of the lit, textured program (`light.vert` + `light.frag`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum LitSlot {
    Projection = 0,
    View = 1,
    Model = 2,
    Albedo = 3,
    Time = 4,
    Ambient = 5,
    LightColor = 6,
    LightDirection = 7,
}

impl LitSlot {
    pub const ALL: [LitSlot; 8] = [
        LitSlot::Projection,
        LitSlot::View,
        LitSlot::Model,
        LitSlot::Albedo,
        LitSlot::Time,
        LitSlot::Ambient,
        LitSlot::LightColor,
        LitSlot::LightDirection,
    ];

    /// GLSL type and name of the uniform behind this slot.
    pub fn declaration(self) -> (&'static str, &'static str) {
        match self {
            LitSlot::Projection => ("mat4", "proj"),
            LitSlot::View => ("mat4", "view"),
            LitSlot::Model => ("mat4", "model"),
            LitSlot::Albedo => ("sampler2D", "albedo"),
            LitSlot::Time => ("float", "time"),
            LitSlot::Ambient => ("vec3", "ambient"),
            LitSlot::LightColor => ("vec3", "lightColor"),
            LitSlot::LightDirection => ("vec3", "lightDirection"),
        }
    }
}

impl UniformSlot for LitSlot {
    fn location(self) -> u32 {
        self as u32
    }
}

/// Slots of the unlit transform program (`mvp.vert` + `basic.frag`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum MvpSlot {
    Projection = 0,
    View = 1,
    Model = 2,
}

impl MvpSlot {
    pub const ALL: [MvpSlot; 3] = [MvpSlot::Projection, MvpSlot::View, MvpSlot::Model];

    pub fn declaration(self) -> (&'static str, &'static str) {
        match self {
            MvpSlot::Projection => ("mat4", "proj"),
            MvpSlot::View => ("mat4", "view"),
            MvpSlot::Model => ("mat4", "model"),
        }
    }
}

impl UniformSlot for MvpSlot {
    fn location(self) -> u32 {
        self as u32
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::abs::read_source;

    fn sources(files: &[&str]) -> String {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("res/shaders");
        files
            .iter()
            .map(|file| read_source(&dir.join(file)).unwrap())
            .collect()
    }

    fn declares(source: &str, location: u32, (ty, name): (&str, &str)) -> bool {
        source.contains(&format!("layout (location = {location}) uniform {ty} {name};"))
    }

    #[test]
    fn lit_table_matches_glsl() {
        let source = sources(&["light.vert", "light.frag"]);
        for slot in LitSlot::ALL {
            assert!(
                declares(&source, slot.location(), slot.declaration()),
                "{slot:?} is not declared at location {}",
                slot.location()
            );
        }
    }

    #[test]
    fn mvp_table_matches_glsl() {
        let source = sources(&["mvp.vert", "basic.frag"]);
        for slot in MvpSlot::ALL {
            assert!(declares(&source, slot.location(), slot.declaration()));
        }
    }

    #[test]
    fn locations_are_unique_and_dense() {
        let locations: Vec<u32> = LitSlot::ALL.iter().map(|s| s.location()).collect();
        assert_eq!(locations, (0..8).collect::<Vec<_>>());
    }
}
