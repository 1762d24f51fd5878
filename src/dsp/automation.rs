/*
Parameter Automation Lanes
==========================

Every cue and soundscape shape in this engine is described as a timeline of
scheduled values on some scalar parameter: a gain, a filter cutoff, an
oscillator frequency. A ParamLane is that timeline.

Vocabulary
----------

  point     A (time, value, curve) triple. `time` is in seconds, relative to
            whatever clock the owner renders against (voice start for cues,
            bed start for soundscapes).

  curve     How the lane travels from the PREVIOUS point to this one:
            Step (jump at this point's time), Linear (straight line), or
            Exponential (geometric glide).

  cursor    A monotonically advancing index used on the audio thread so a
            lane sampled once per sample never rescans its points.


The Shape
---------

  value
   0.5 |        ___
       |       /   \
       |      /     \_
       |     |        \__
   0.0 |_____|           \_______________
       +-----+---+-------+---------------> time
            set  lin     exp

A lane holds its initial value until the first point. A ramp placed first
glides from (0.0, initial). After the last point the lane holds that point's
value until the owner is dropped, so a decay that ends at 0.001 stays at
0.001; shapes that need true silence finish with a Step or Linear to 0.


Exponential Segments
--------------------

A geometric glide can never reach or cross zero: the interpolation is

    value = from * (to / from) ^ frac

so both endpoints are clamped to EXP_FLOOR (0.0001, quiet enough to be
inaudible) during evaluation. The raw target value is still what the lane
holds once the point's time has passed, which lets "glide toward zero, then
hold zero" read naturally at call sites.


Teardown
--------

`anchor` pins the lane to whatever value it has at a given time and discards
everything scheduled after it. Fading out a running soundscape is
anchor-then-ramp: freeze the current gain mid-glide, then schedule a short
linear ramp to zero from there. Without the anchor, the ramp would interpolate
from the previous point's value and produce an audible jump.
*/

use crate::MIN_TIME;

/// Values this close to zero are treated as zero by exponential segments.
const EXP_FLOOR: f32 = 1.0e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Curve {
    Step,
    Linear,
    Exponential,
}

#[derive(Debug, Clone, Copy)]
struct Point {
    time: f64,
    value: f32,
    curve: Curve,
}

/// Scheduled automation timeline for one scalar parameter.
#[derive(Debug, Clone)]
pub struct ParamLane {
    initial: f32,
    points: Vec<Point>,
    cursor: usize,
}

impl ParamLane {
    pub fn new(initial: f32) -> Self {
        Self {
            initial,
            points: Vec::new(),
            cursor: 0,
        }
    }

    /// A lane that never moves. Reads better than `new` for fixed
    /// frequencies and gains.
    pub fn constant(value: f32) -> Self {
        Self::new(value)
    }

    // Builder forms, for describing a whole shape in one expression.

    pub fn set_at(mut self, time: f64, value: f32) -> Self {
        self.set(time, value);
        self
    }

    pub fn linear_to(mut self, time: f64, value: f32) -> Self {
        self.ramp_linear(time, value);
        self
    }

    pub fn exp_to(mut self, time: f64, value: f32) -> Self {
        self.ramp_exp(time, value);
        self
    }

    // In-place forms, for lanes that are reshaped after construction.

    /// Jump to `value` at `time`.
    pub fn set(&mut self, time: f64, value: f32) {
        self.push(time, value, Curve::Step);
    }

    /// Ramp linearly from the previous point, arriving at `time`.
    pub fn ramp_linear(&mut self, time: f64, value: f32) {
        self.push(time, value, Curve::Linear);
    }

    /// Glide geometrically from the previous point, arriving at `time`.
    pub fn ramp_exp(&mut self, time: f64, value: f32) {
        self.push(time, value, Curve::Exponential);
    }

    fn push(&mut self, time: f64, value: f32, curve: Curve) {
        debug_assert!(
            self.points.last().map_or(true, |p| time >= p.time),
            "lane points must be scheduled in time order"
        );
        self.points.push(Point { time, value, curve });
    }

    /// Discard every point scheduled strictly after `time`.
    pub fn cancel_after(&mut self, time: f64) {
        self.points.retain(|p| p.time <= time);
        self.cursor = self.cursor.min(self.points.len());
    }

    /// Pin the lane to its value at `time` and discard everything after.
    ///
    /// The pinned value is evaluated before cancelling, so anchoring in the
    /// middle of a ramp freezes the in-progress value rather than snapping
    /// back to the ramp's starting point.
    pub fn anchor(&mut self, time: f64) {
        let value = self.value_at(time);
        self.cancel_after(time);
        self.push(time, value, Curve::Step);
    }

    /// The value the lane settles on once all points have passed.
    pub fn end_value(&self) -> f32 {
        self.points.last().map_or(self.initial, |p| p.value)
    }

    /// Evaluate at an arbitrary time. Stateless; fine for control-thread
    /// queries and tests.
    pub fn value_at(&self, time: f64) -> f32 {
        let next = self.points.partition_point(|p| p.time <= time);
        self.eval(next, time)
    }

    /// Evaluate at `time`, advancing the internal cursor.
    ///
    /// Callers must sample with non-decreasing times; the audio thread does,
    /// because voice time only moves forward.
    #[inline]
    pub fn sample(&mut self, time: f64) -> f32 {
        while self.cursor < self.points.len() && self.points[self.cursor].time <= time {
            self.cursor += 1;
        }
        self.eval(self.cursor, time)
    }

    /// `next` is the index of the first point strictly after `time`.
    fn eval(&self, next: usize, time: f64) -> f32 {
        let (prev_time, prev_value) = if next == 0 {
            (0.0, self.initial)
        } else {
            let p = self.points[next - 1];
            (p.time, p.value)
        };

        let Some(target) = self.points.get(next) else {
            return prev_value;
        };

        match target.curve {
            Curve::Step => prev_value,
            Curve::Linear => {
                let span = target.time - prev_time;
                if span < MIN_TIME {
                    return target.value;
                }
                let frac = ((time - prev_time) / span) as f32;
                prev_value + (target.value - prev_value) * frac
            }
            Curve::Exponential => {
                let span = target.time - prev_time;
                if span < MIN_TIME {
                    return target.value;
                }
                let frac = ((time - prev_time) / span) as f32;
                let from = prev_value.max(EXP_FLOOR);
                let to = target.value.max(EXP_FLOOR);
                from * (to / from).powf(frac)
            }
        }
    }
}
