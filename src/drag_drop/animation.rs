use egui::emath::easing;

/// Easing curve of a [`Tween`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Easing {
    Linear,
    /// Slow start and end; the default for pick-up and settle.
    #[default]
    CubicInOut,
    CubicOut,
    QuadraticOut,
}

impl Easing {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => easing::linear(t),
            Self::CubicInOut => easing::cubic_in_out(t),
            Self::CubicOut => easing::cubic_out(t),
            Self::QuadraticOut => easing::quadratic_out(t),
        }
    }
}

/// A duration-based animation spec.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Tween {
    /// Duration in seconds. Zero (or negative) finishes on the first tick.
    pub duration: f32,
    pub easing: Easing,
}

impl Tween {
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            easing: Easing::default(),
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
}

impl Default for Tween {
    fn default() -> Self {
        Self::new(0.3)
    }
}

/// Identifies one run of an [`Animatable`].
///
/// A run that is stopped, snapped or superseded never finishes, so whoever holds its token can
/// tell "my animation completed" apart from "someone else took over".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimationToken(u64);

#[derive(Clone, Copy, Debug)]
struct Run {
    token: AnimationToken,
    from: f32,
    to: f32,
    spec: Tween,
    /// Set on the first tick after the run was requested.
    started_at: Option<f64>,
}

/// A single `f32` driven towards a target by explicit [`Self::tick`] calls on the frame loop.
#[derive(Clone, Debug, Default)]
pub struct Animatable {
    value: f32,
    run: Option<Run>,
    next_token: u64,
}

impl Animatable {
    pub fn new(value: f32) -> Self {
        Self {
            value,
            ..Default::default()
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    pub fn target(&self) -> Option<f32> {
        self.run.map(|run| run.to)
    }

    /// Start animating from the current value towards `to`, interrupting any running animation.
    pub fn animate_to(&mut self, to: f32, spec: Tween) -> AnimationToken {
        self.next_token = self.next_token.wrapping_add(1);
        let token = AnimationToken(self.next_token);
        self.run = Some(Run {
            token,
            from: self.value,
            to,
            spec,
            started_at: None,
        });
        token
    }

    /// Stop where we are.
    pub fn stop(&mut self) {
        self.run = None;
    }

    pub fn snap_to(&mut self, value: f32) {
        self.run = None;
        self.value = value;
    }

    /// Advance the running animation to `now` (seconds).
    ///
    /// Returns the token of the run that finished during this tick, if any.
    pub fn tick(&mut self, now: f64) -> Option<AnimationToken> {
        let run = self.run.as_mut()?;
        let started_at = *run.started_at.get_or_insert(now);

        let duration = f64::from(run.spec.duration.max(0.0));
        let t = if duration <= 0.0 {
            1.0
        } else {
            ((now - started_at) / duration).clamp(0.0, 1.0) as f32
        };

        let eased = run.spec.easing.apply(t);
        self.value = run.from + (run.to - run.from) * eased;

        if t >= 1.0 {
            self.value = run.to;
            let token = run.token;
            self.run = None;
            Some(token)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_starts_on_first_tick_and_finishes_at_duration() {
        let mut anim = Animatable::new(0.0);
        let token = anim.animate_to(1.0, Tween::new(0.5).with_easing(Easing::Linear));
        assert_eq!(anim.target(), Some(1.0));

        assert_eq!(anim.tick(10.0), None);
        assert_eq!(anim.value(), 0.0);
        assert_eq!(anim.tick(10.25), None);
        assert!((anim.value() - 0.5).abs() < 1e-6);
        assert_eq!(anim.tick(10.5), Some(token));
        assert_eq!(anim.value(), 1.0);
        assert!(!anim.is_running());
        assert_eq!(anim.target(), None);
        assert_eq!(anim.tick(11.0), None);
    }

    #[test]
    fn superseded_run_never_reports_its_token() {
        let mut anim = Animatable::new(1.0);
        let cancel = anim.animate_to(0.0, Tween::new(1.0).with_easing(Easing::Linear));
        anim.tick(0.0);
        anim.tick(0.5);

        let restart = anim.animate_to(1.0, Tween::new(1.0).with_easing(Easing::Linear));
        assert_ne!(cancel, restart);

        anim.tick(1.0);
        assert_eq!(anim.tick(2.0), Some(restart));
    }

    #[test]
    fn stop_keeps_value_and_snap_overrides_it() {
        let mut anim = Animatable::new(0.0);
        anim.animate_to(1.0, Tween::new(1.0).with_easing(Easing::Linear));
        anim.tick(0.0);
        anim.tick(0.25);
        anim.stop();
        assert!(!anim.is_running());
        assert!((anim.value() - 0.25).abs() < 1e-6);

        anim.snap_to(0.0);
        assert_eq!(anim.value(), 0.0);
    }

    #[test]
    fn zero_duration_finishes_immediately() {
        let mut anim = Animatable::new(0.0);
        let token = anim.animate_to(1.0, Tween::new(0.0));
        assert_eq!(anim.tick(3.0), Some(token));
        assert_eq!(anim.value(), 1.0);
    }
}
