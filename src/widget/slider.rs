use log::{debug, trace};
use serde::{Deserialize, Serialize};

use super::surface::{PointerId, TrackBounds, TrackSurface};
use crate::core::{format_plain, round_half_up};

pub type Formatter = fn(f64) -> String;

/// Range, step and label formatting for one slider.
#[derive(Debug, Clone, Copy)]
pub struct SliderSpec {
    min: f64,
    max: f64,
    step: f64,
    format: Option<Formatter>,
    unit: &'static str,
}

impl SliderSpec {
    /// # Panics
    ///
    /// Panics unless `min < max` and `step > 0`, all finite.
    pub fn new(min: f64, max: f64, step: f64) -> Self {
        assert!(
            min.is_finite() && max.is_finite() && min < max,
            "slider range must satisfy min < max (got {min}..{max})"
        );
        assert!(
            step.is_finite() && step > 0.0,
            "slider step must be > 0 (got {step})"
        );
        Self {
            min,
            max,
            step,
            format: None,
            unit: "",
        }
    }

    pub fn with_format(mut self, format: Formatter) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_unit(mut self, unit: &'static str) -> Self {
        self.unit = unit;
        self
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.min;
        }
        value.clamp(self.min, self.max)
    }

    /// Maps a pointer x coordinate to a stepped, clamped value.
    ///
    /// Returns `None` when the track has no usable geometry.
    pub fn value_at(&self, client_x: f64, bounds: TrackBounds) -> Option<f64> {
        if !bounds.is_measured() || !client_x.is_finite() {
            return None;
        }
        let fraction = ((client_x - bounds.left) / bounds.width).clamp(0.0, 1.0);
        let raw = self.min + fraction * (self.max - self.min);
        let stepped = round_half_up(raw / self.step) * self.step;
        let clamped = self.clamp(stepped);
        // Strip step arithmetic noise such as 4.4000000000000004.
        Some(round_half_up(clamped * 1_000.0) / 1_000.0)
    }

    pub fn percentage(&self, value: f64) -> f64 {
        (value - self.min) / (self.max - self.min) * 100.0
    }

    pub fn label(&self, value: f64) -> String {
        let text = match self.format {
            Some(format) => format(value),
            None => format_plain(value),
        };
        format!("{text}{}", self.unit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum PointerEvent {
    #[serde(rename_all = "camelCase")]
    Down { pointer_id: PointerId, client_x: f64 },
    #[serde(rename_all = "camelCase")]
    Move { pointer_id: PointerId, client_x: f64 },
    #[serde(rename_all = "camelCase")]
    Up { pointer_id: PointerId },
    #[serde(rename_all = "camelCase")]
    Cancel { pointer_id: PointerId },
    #[serde(rename_all = "camelCase")]
    Leave { pointer_id: PointerId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    Idle,
    Dragging { pointer_id: PointerId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Started,
    Released,
    /// Like `Released`, but the host cancelled the gesture. The last
    /// committed value stands.
    Cancelled,
    /// Pointer left the track after capture was lost without an up event.
    Recovered,
}

/// What handling one pointer event did.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EventOutcome {
    pub committed: Option<f64>,
    /// The host should suppress scroll/selection for this event.
    pub default_prevented: bool,
    pub transition: Option<Transition>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SliderState {
    pub value: f64,
    pub dragging: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SliderView {
    pub value: f64,
    pub value_text: String,
    pub min_text: String,
    pub max_text: String,
    pub percentage: f64,
    pub dragging: bool,
}

/// A draggable track plus thumb controlling one value.
#[derive(Debug, Clone)]
pub struct DragSlider {
    spec: SliderSpec,
    value: f64,
    phase: DragPhase,
}

impl DragSlider {
    pub fn new(spec: SliderSpec, initial: f64) -> Self {
        Self {
            value: spec.clamp(initial),
            spec,
            phase: DragPhase::Idle,
        }
    }

    pub fn spec(&self) -> &SliderSpec {
        &self.spec
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging { .. })
    }

    pub fn state(&self) -> SliderState {
        SliderState {
            value: self.value,
            dragging: self.is_dragging(),
        }
    }

    /// Sets the value from outside a drag, clamped into range.
    pub fn set_value(&mut self, value: f64) -> f64 {
        self.value = self.spec.clamp(value);
        self.value
    }

    pub fn percentage(&self) -> f64 {
        self.spec.percentage(self.value)
    }

    pub fn view(&self) -> SliderView {
        SliderView {
            value: self.value,
            value_text: self.spec.label(self.value),
            min_text: self.spec.label(self.spec.min),
            max_text: self.spec.label(self.spec.max),
            percentage: self.percentage(),
            dragging: self.is_dragging(),
        }
    }

    /// Feeds one pointer event through the drag state machine.
    ///
    /// `on_change` runs with every committed value, including each move of
    /// an ongoing drag.
    pub fn handle<S, F>(
        &mut self,
        event: PointerEvent,
        surface: &mut S,
        on_change: F,
    ) -> EventOutcome
    where
        S: TrackSurface + ?Sized,
        F: FnMut(f64),
    {
        let captured = match self.phase {
            DragPhase::Dragging { pointer_id } => Some(pointer_id),
            DragPhase::Idle => None,
        };
        let mut outcome = EventOutcome::default();

        match event {
            PointerEvent::Down {
                pointer_id,
                client_x,
            } if captured.is_none() => {
                surface.set_pointer_capture(pointer_id);
                self.phase = DragPhase::Dragging { pointer_id };
                debug!("slider drag started by pointer {pointer_id}");
                outcome.default_prevented = true;
                outcome.transition = Some(Transition::Started);
                outcome.committed = self.commit(client_x, &*surface, on_change);
            }
            PointerEvent::Move {
                pointer_id,
                client_x,
            } if captured == Some(pointer_id) => {
                outcome.default_prevented = true;
                outcome.committed = self.commit(client_x, &*surface, on_change);
            }
            PointerEvent::Up { pointer_id } if captured == Some(pointer_id) => {
                self.finish(pointer_id, surface);
                outcome.transition = Some(Transition::Released);
            }
            PointerEvent::Cancel { pointer_id } if captured == Some(pointer_id) => {
                self.finish(pointer_id, surface);
                outcome.transition = Some(Transition::Cancelled);
            }
            PointerEvent::Leave { pointer_id }
                if captured == Some(pointer_id) && !surface.has_pointer_capture(pointer_id) =>
            {
                self.phase = DragPhase::Idle;
                debug!("slider drag by pointer {pointer_id} dropped after losing capture");
                outcome.transition = Some(Transition::Recovered);
            }
            event => {
                trace!("slider ignored {event:?} while {:?}", self.phase);
            }
        }

        outcome
    }

    fn commit<S, F>(&mut self, client_x: f64, surface: &S, mut on_change: F) -> Option<f64>
    where
        S: TrackSurface + ?Sized,
        F: FnMut(f64),
    {
        let Some(value) = surface
            .track_bounds()
            .and_then(|bounds| self.spec.value_at(client_x, bounds))
        else {
            trace!("slider track not measured; keeping {}", self.value);
            return None;
        };
        self.value = value;
        trace!("slider committed {value}");
        on_change(value);
        Some(value)
    }

    fn finish<S>(&mut self, pointer_id: PointerId, surface: &mut S)
    where
        S: TrackSurface + ?Sized,
    {
        if surface.has_pointer_capture(pointer_id) {
            surface.release_pointer_capture(pointer_id);
        }
        self.phase = DragPhase::Idle;
        debug!("slider drag by pointer {pointer_id} ended at {}", self.value);
    }
}
