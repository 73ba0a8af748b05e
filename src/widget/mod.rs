mod calculator;
mod slider;
mod surface;

pub use calculator::{
    Calculator, CalculatorView, ChartPoint, ChartView, InputField, LabeledSlider, SummaryCards,
    Tooltip,
};
pub use slider::{
    DragPhase, DragSlider, EventOutcome, Formatter, PointerEvent, SliderSpec, SliderState,
    SliderView, Transition,
};
pub use surface::{PointerId, TrackBounds, TrackSurface, VirtualTrack};
