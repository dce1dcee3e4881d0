// What the OLED should show
//
// Provides:
// - Display directives (the renderer draws them, we only pick them)
// - Timed one-shot sequences stepped by the control loop
// - The presenter mapping commands and link events to directives

mod directive;
mod presenter;
mod sequence;

pub use directive::{orbit_dot, Arrow, ConnectFrame, DisplayDirective, Dot};
pub use presenter::{LinkEvent, Presenter};
pub use sequence::{Frame, Sequence, SequenceKind, Step};
