//! Staggered position transitions.
//!
//! A [`Transition`] tweens every node from its old to its new position over
//! the same duration, each starting after its own delay. Flat layouts delay
//! node `i` by `i × stagger`; leveled layouts delay by `level × stagger` so
//! a whole level moves together. The caller drives time with
//! [`Transition::tick`].

use std::time::Duration;

use crate::graph::{Node, Position};

/// Cubic ease-in-out (slow start and end).
#[inline]
pub fn ease_in_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Tween {
    from: Position,
    to: Position,
    delay: Duration,
}

#[derive(Debug, Clone)]
pub struct Transition {
    tweens: Vec<Tween>,
    target: Vec<Node>,
    duration: Duration,
    elapsed: Duration,
}

impl Transition {
    /// Tween from `from` to `target`, matched by index.
    ///
    /// `levels`, when given, holds one level per node and groups the stagger.
    pub fn new(
        from: &[Node],
        target: Vec<Node>,
        levels: Option<&[usize]>,
        duration: Duration,
        stagger: Duration,
    ) -> Self {
        let tweens = from
            .iter()
            .zip(&target)
            .enumerate()
            .map(|(i, (old, new))| {
                let step = levels.and_then(|l| l.get(i).copied()).unwrap_or(i);
                Tween {
                    from: old.position,
                    to: new.position,
                    delay: stagger.saturating_mul(u32::try_from(step).unwrap_or(u32::MAX)),
                }
            })
            .collect();

        Self {
            tweens,
            target,
            duration,
            elapsed: Duration::ZERO,
        }
    }

    pub fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    /// Time until the last tween lands.
    pub fn total_duration(&self) -> Duration {
        let longest_delay = self.tweens.iter().map(|t| t.delay).max().unwrap_or_default();
        longest_delay.saturating_add(self.duration)
    }

    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.total_duration()
    }

    /// Interpolated nodes at the current time.
    pub fn frame(&self) -> Vec<Node> {
        self.target
            .iter()
            .zip(&self.tweens)
            .map(|(node, tween)| node.moved_to(self.sample(tween)))
            .collect()
    }

    fn sample(&self, tween: &Tween) -> Position {
        let local = self.elapsed.saturating_sub(tween.delay);
        let t = if self.duration.is_zero() {
            1.0
        } else {
            local.as_secs_f64() / self.duration.as_secs_f64()
        };
        if t >= 1.0 {
            return tween.to;
        }
        let e = ease_in_out_cubic(t);
        Position::new(
            tween.from.x + (tween.to.x - tween.from.x) * e,
            tween.from.y + (tween.to.y - tween.from.y) * e,
        )
    }

    pub fn target(&self) -> &[Node] {
        &self.target
    }

    pub fn into_target(self) -> Vec<Node> {
        self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn pair() -> (Vec<Node>, Vec<Node>) {
        let from = vec![Node::new("a", "start", 0.0, 0.0), Node::new("b", "step", 0.0, 0.0)];
        let to = vec![Node::new("a", "start", 100.0, 0.0), Node::new("b", "step", 0.0, 100.0)];
        (from, to)
    }

    #[test]
    fn test_easing_endpoints() {
        assert_eq!(ease_in_out_cubic(0.0), 0.0);
        assert_eq!(ease_in_out_cubic(1.0), 1.0);
        assert!((ease_in_out_cubic(0.5) - 0.5).abs() < 1e-12);
        assert!(ease_in_out_cubic(0.25) < 0.25);
    }

    #[test]
    fn test_frame_starts_at_origin_and_ends_at_target() {
        let (from, to) = pair();
        let mut transition = Transition::new(&from, to.clone(), None, ms(300), ms(30));

        assert_eq!(transition.frame(), from.iter().zip(&to).map(|(f, t)| t.moved_to(f.position)).collect::<Vec<_>>());
        transition.tick(ms(1000));
        assert!(transition.is_complete());
        assert_eq!(transition.frame(), to);
    }

    #[test]
    fn test_stagger_delays_later_nodes() {
        let (from, to) = pair();
        let mut transition = Transition::new(&from, to, None, ms(300), ms(100));
        assert_eq!(transition.total_duration(), ms(400));

        transition.tick(ms(150));
        let frame = transition.frame();
        assert!(frame[0].position.x > 0.0);
        assert!(frame[1].position.y > 0.0 && frame[1].position.y < frame[0].position.x);
        assert!(!transition.is_complete());
    }

    #[test]
    fn test_levels_move_together() {
        let (from, to) = pair();
        let mut transition = Transition::new(&from, to, Some(&[0, 0]), ms(300), ms(100));
        assert_eq!(transition.total_duration(), ms(300));

        transition.tick(ms(150));
        let frame = transition.frame();
        assert!((frame[0].position.x - frame[1].position.y).abs() < 1e-9);
    }

    #[test]
    fn test_zero_duration_jumps() {
        let (from, to) = pair();
        let transition = Transition::new(&from, to.clone(), None, Duration::ZERO, Duration::ZERO);
        assert!(transition.is_complete());
        assert_eq!(transition.frame(), to);
    }
}
