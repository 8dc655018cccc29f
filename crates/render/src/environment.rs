use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Scene colours as `0xRRGGBB`.
pub mod palette {
    /// Clear colour and fog colour.
    pub const BACKGROUND: u32 = 0x1A2130;
    pub const WATER: u32 = 0x001E0F;
    pub const HEMISPHERE_SKY: u32 = 0x1679AB;
    pub const HEMISPHERE_GROUND: u32 = 0x9BEC00;
    pub const SUN: u32 = 0x850F8D;
    pub const BOAT: u32 = 0xC8A165;
    pub const CHARACTER: u32 = 0xE8B89A;
    pub const TRASH: u32 = 0x8A8F99;
}

/// Linear `[0, 1]` RGB from a `0xRRGGBB` value.
pub fn rgb(hex: u32) -> Vec3 {
    let channel = |shift: u32| ((hex >> shift) & 0xFF) as f32 / 255.0;
    Vec3::new(channel(16), channel(8), channel(0))
}

/// Unit vector pointing at the sun.
///
/// Elevation is measured up from the horizon and azimuth around +Y, both in
/// degrees; azimuth 0 faces +Z.
pub fn sun_direction(elevation_deg: f32, azimuth_deg: f32) -> Vec3 {
    let phi = (90.0 - elevation_deg).to_radians();
    let theta = azimuth_deg.to_radians();
    Vec3::new(
        phi.sin() * theta.sin(),
        phi.cos(),
        phi.sin() * theta.cos(),
    )
}

/// Atmospheric scattering terms for the sky dome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkyParams {
    pub turbidity: f32,
    pub rayleigh: f32,
    pub mie_coefficient: f32,
    /// Henyey-Greenstein asymmetry of the sun halo.
    pub mie_directional_g: f32,
}

impl Default for SkyParams {
    fn default() -> Self {
        Self {
            turbidity: 10.0,
            rayleigh: 2.0,
            mie_coefficient: 0.005,
            mie_directional_g: 0.8,
        }
    }
}

/// Lighting and fog parameters edited from the GUI panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    hemisphere_intensity: f32,
    directional_intensity: f32,
    fog_density: f32,
    pub sun_elevation: f32,
    pub sun_azimuth: f32,
    pub sky: SkyParams,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            hemisphere_intensity: 5.0,
            directional_intensity: 70.0,
            fog_density: 0.0,
            sun_elevation: 2.0,
            sun_azimuth: 180.0,
            sky: SkyParams::default(),
        }
    }
}

impl Environment {
    pub const HEMISPHERE_RANGE: RangeInclusive<f32> = 0.0..=10.0;
    pub const DIRECTIONAL_RANGE: RangeInclusive<f32> = 0.0..=100.0;
    pub const FOG_RANGE: RangeInclusive<f32> = 0.0..=0.1;

    pub fn hemisphere_intensity(&self) -> f32 {
        self.hemisphere_intensity
    }

    pub fn directional_intensity(&self) -> f32 {
        self.directional_intensity
    }

    /// Exponential-squared fog density. Zero disables fog.
    pub fn fog_density(&self) -> f32 {
        self.fog_density
    }

    pub fn set_hemisphere_intensity(&mut self, value: f32) {
        set_clamped(&mut self.hemisphere_intensity, value, &Self::HEMISPHERE_RANGE);
    }

    pub fn set_directional_intensity(&mut self, value: f32) {
        set_clamped(
            &mut self.directional_intensity,
            value,
            &Self::DIRECTIONAL_RANGE,
        );
    }

    pub fn set_fog_density(&mut self, value: f32) {
        set_clamped(&mut self.fog_density, value, &Self::FOG_RANGE);
    }

    pub fn sun_direction(&self) -> Vec3 {
        sun_direction(self.sun_elevation, self.sun_azimuth)
    }
}

fn set_clamped(slot: &mut f32, value: f32, range: &RangeInclusive<f32>) {
    if value.is_nan() {
        return;
    }
    let clamped = value.clamp(*range.start(), *range.end());
    if clamped != *slot {
        tracing::debug!(value = clamped, "environment changed");
    }
    *slot = clamped;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_panel() {
        let env = Environment::default();
        assert_eq!(env.hemisphere_intensity(), 5.0);
        assert_eq!(env.directional_intensity(), 70.0);
        assert_eq!(env.fog_density(), 0.0);
        assert_eq!(env.sky.turbidity, 10.0);
        assert_eq!(env.sky.rayleigh, 2.0);
        assert_eq!(env.sky.mie_coefficient, 0.005);
        assert_eq!(env.sky.mie_directional_g, 0.8);
    }

    #[test]
    fn setters_clamp_to_range() {
        let mut env = Environment::default();
        env.set_hemisphere_intensity(12.0);
        env.set_directional_intensity(-3.0);
        env.set_fog_density(0.5);
        assert_eq!(env.hemisphere_intensity(), 10.0);
        assert_eq!(env.directional_intensity(), 0.0);
        assert_eq!(env.fog_density(), 0.1);

        env.set_fog_density(f32::NAN);
        assert_eq!(env.fog_density(), 0.1);
    }

    #[test]
    fn hex_colours() {
        assert_eq!(rgb(0xFF0000), Vec3::new(1.0, 0.0, 0.0));
        let water = rgb(palette::WATER);
        assert_eq!(water.x, 0.0);
        assert!((water.y - 30.0 / 255.0).abs() < 1e-6);
        assert!((water.z - 15.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn sun_on_horizon_faces_minus_z() {
        let d = Environment::default().sun_direction();
        assert!((d.length() - 1.0).abs() < 1e-5);
        assert!(d.y > 0.0 && d.y < 0.05);
        assert!(d.z < -0.99);
        assert!(d.x.abs() < 1e-4);
    }

    #[test]
    fn sun_at_zenith() {
        let d = sun_direction(90.0, 37.0);
        assert!((d - Vec3::Y).length() < 1e-5);
    }
}
