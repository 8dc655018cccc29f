use glam::Vec3;
use std::fmt::Write;
use tidewater_common::Role;
use tidewater_kernel::World;

/// Camera configuration for rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(30.0, 30.0, 100.0),
            target: Vec3::new(0.0, 10.0, 0.0),
            fov_degrees: 55.0,
        }
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads world state and a view, then produces output. It
/// never mutates the world.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given world state and view.
    fn render(&self, world: &World, view: &RenderView) -> Self::Output;
}

/// Text renderer for the CLI, logs and tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    /// Also list every visible trash item.
    pub list_trash: bool,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trash_list() -> Self {
        Self { list_trash: true }
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, world: &World, view: &RenderView) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            "=== Scene (tick={}, seed={:#x}) ===",
            world.tick(),
            world.config().seed
        );
        let _ = writeln!(
            out,
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0}",
            view.eye.x, view.eye.y, view.eye.z, view.target.x, view.target.y, view.target.z,
            view.fov_degrees
        );

        for role in Role::ALL {
            let vessel = world.vessel(role);
            match vessel.position() {
                Some(p) => {
                    let _ = writeln!(
                        out,
                        "{:<9} pos=({:.2}, {:.2}, {:.2}) yaw={:.2} vel={:.2} rot={:.2}",
                        role.label(),
                        p.x,
                        p.y,
                        p.z,
                        vessel.transform.yaw(),
                        vessel.speed.vel,
                        vessel.speed.rot
                    );
                }
                None => {
                    let _ = writeln!(out, "{:<9} (not loaded)", role.label());
                }
            }
        }

        match world.animation().clip() {
            Some(clip) => {
                let _ = writeln!(
                    out,
                    "Animation: {clip} t={:.2}s",
                    world.animation().elapsed()
                );
            }
            None => {
                let _ = writeln!(out, "Animation: none");
            }
        }

        let _ = writeln!(
            out,
            "Trash: visible={} tracked={}",
            world.visible_count(),
            world.tracked_count()
        );
        if self.list_trash {
            for item in world.visible_trash() {
                let p = item.position();
                let _ = writeln!(
                    out,
                    "  [{}] pos=({:.2}, {:.2}, {:.2})",
                    item.id.short(),
                    p.x,
                    p.y,
                    p.z
                );
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidewater_common::ModelHandle;

    #[test]
    fn empty_scene() {
        let world = World::default();
        let output = DebugTextRenderer::new().render(&world, &RenderView::default());

        assert!(output.contains("tick=0"));
        assert!(output.contains("boat      (not loaded)"));
        assert!(output.contains("Trash: visible=0 tracked=0"));
        assert!(output.contains("Animation: none"));
    }

    #[test]
    fn loaded_scene() {
        let mut world = World::default();
        world.attach_model(Role::Boat, ModelHandle(1), None);
        world.attach_model(Role::Character, ModelHandle(2), Some("Swim"));
        world.spawn_trash_at(ModelHandle(3), Vec3::new(400.0, 0.0, 400.0));
        world.spawn_trash_at(ModelHandle(3), Vec3::new(-400.0, 0.0, 400.0));

        let renderer = DebugTextRenderer::with_trash_list();
        let output = renderer.render(&world, &RenderView::default());

        assert!(output.contains("boat      pos=(5.00, 13.00, 50.00)"));
        assert!(output.contains("Animation: Swim"));
        assert!(output.contains("Trash: visible=2 tracked=2"));
        assert_eq!(output.matches("  [").count(), 2);
    }

    #[test]
    fn render_view_default() {
        let view = RenderView::default();
        assert_eq!(view.fov_degrees, 55.0);
        assert_eq!(view.target, Vec3::new(0.0, 10.0, 0.0));
    }
}
