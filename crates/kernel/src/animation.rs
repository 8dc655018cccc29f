/// Playback cursor for the character's active animation clip.
///
/// Only time advances here; skinning and clip blending belong to the
/// renderer that owns the model data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationPlayer {
    clip: Option<String>,
    elapsed: f32,
}

impl AnimationPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start `clip` from the beginning.
    pub fn play(&mut self, clip: impl Into<String>) {
        self.clip = Some(clip.into());
        self.elapsed = 0.0;
    }

    pub fn stop(&mut self) {
        self.clip = None;
        self.elapsed = 0.0;
    }

    /// Advance by `dt` seconds. No-op while nothing is playing.
    pub fn advance(&mut self, dt: f32) {
        if self.clip.is_some() && dt.is_finite() && dt > 0.0 {
            self.elapsed += dt;
        }
    }

    pub fn clip(&self) -> Option<&str> {
        self.clip.as_deref()
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn is_playing(&self) -> bool {
        self.clip.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_player_does_not_advance() {
        let mut p = AnimationPlayer::new();
        p.advance(1.0);
        assert_eq!(p.elapsed(), 0.0);
        assert!(!p.is_playing());
    }

    #[test]
    fn play_resets_and_advances() {
        let mut p = AnimationPlayer::new();
        p.play("Swim");
        p.advance(0.5);
        p.advance(0.25);
        assert_eq!(p.clip(), Some("Swim"));
        assert!((p.elapsed() - 0.75).abs() < 1e-6);

        p.play("Death");
        assert_eq!(p.elapsed(), 0.0);
    }

    #[test]
    fn negative_delta_ignored() {
        let mut p = AnimationPlayer::new();
        p.play("Swim");
        p.advance(-1.0);
        p.advance(f32::NAN);
        assert_eq!(p.elapsed(), 0.0);
    }
}
