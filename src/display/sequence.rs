// One-shot display sequences
//
// A sequence is a list of frames, each held for a fixed time. The control
// loop steps it once per tick with the current time; while a sequence is
// running no commands are read.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use nanorand::{Rng, WyRand};

use super::directive::{
    orbit_dot, ConnectFrame, DisplayDirective, Dot, LABEL_CONNECTED, LABEL_DISCONNECTED,
    LABEL_READY, LABEL_TEST_OK, LABEL_TEST_TITLE,
};
use crate::config::{
    CONNECT_BAR_FRAME, CONNECT_BAR_STEP, CONNECT_ORBIT_FRAME, CONNECT_ORBIT_RADIUS,
    CONNECT_ORBIT_STEP_DEG, CONNECT_READY_HOLD, DISCONNECT_HOLD, SCREEN_HEIGHT, SCREEN_WIDTH,
    TEST_CONFIRM_HOLD, TEST_PATTERN_DOTS, TEST_PATTERN_HOLD,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceKind {
    Connect,
    DisplayTest,
    Disconnect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub directive: DisplayDirective,
    pub hold: Duration,
}

impl Frame {
    fn new(directive: DisplayDirective, hold: Duration) -> Self {
        Self { directive, hold }
    }
}

/// Result of stepping a sequence
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Current frame still on screen
    Hold,
    /// Next frame is due
    Show(DisplayDirective),
    /// Last frame's hold expired
    Done(SequenceKind),
}

#[derive(Debug)]
pub struct Sequence {
    kind: SequenceKind,
    frames: VecDeque<Frame>,
    hold_until: Instant,
}

impl Sequence {
    /// Start a sequence; returns it together with the first frame to show now
    pub fn start(kind: SequenceKind, frames: Vec<Frame>, now: Instant) -> (Self, Option<DisplayDirective>) {
        let mut sequence = Self {
            kind,
            frames: frames.into(),
            hold_until: now,
        };
        let first = match sequence.advance(now) {
            Step::Show(directive) => Some(directive),
            _ => None,
        };
        (sequence, first)
    }

    pub fn advance(&mut self, now: Instant) -> Step {
        if now < self.hold_until {
            return Step::Hold;
        }
        match self.frames.pop_front() {
            Some(frame) => {
                self.hold_until = now + frame.hold;
                Step::Show(frame.directive)
            }
            None => Step::Done(self.kind),
        }
    }

    /// Frames not yet shown
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

/// Orbiting dot, growing progress bar, "LISTO!", then a blank screen
pub fn connect_frames() -> Vec<Frame> {
    let mut frames = Vec::new();

    for angle in (0..360).step_by(CONNECT_ORBIT_STEP_DEG as usize) {
        let orbit = ConnectFrame::Orbit {
            angle,
            dot: orbit_dot(angle, CONNECT_ORBIT_RADIUS),
            label: LABEL_CONNECTED.to_string(),
        };
        frames.push(Frame::new(
            DisplayDirective::Connecting { frame: orbit },
            CONNECT_ORBIT_FRAME,
        ));
    }

    for width in (0..SCREEN_WIDTH).step_by(CONNECT_BAR_STEP as usize) {
        frames.push(Frame::new(
            DisplayDirective::Connecting {
                frame: ConnectFrame::Progress { width },
            },
            CONNECT_BAR_FRAME,
        ));
    }

    frames.push(Frame::new(
        DisplayDirective::Connecting {
            frame: ConnectFrame::Ready {
                label: LABEL_READY.to_string(),
            },
        },
        CONNECT_READY_HOLD,
    ));
    frames.push(Frame::new(DisplayDirective::Clear, Duration::ZERO));

    frames
}

/// Random dots inside the bordered area, the confirmation banner, then a blank screen
pub fn display_test_frames(rng: &mut WyRand) -> Vec<Frame> {
    let dots = (0..TEST_PATTERN_DOTS)
        .map(|_| Dot {
            x: rng.generate_range(1..(SCREEN_WIDTH - 2) as u16) as i16,
            y: rng.generate_range(11..(SCREEN_HEIGHT - 12) as u16) as i16,
        })
        .collect();

    vec![
        Frame::new(
            DisplayDirective::TestPattern {
                title: LABEL_TEST_TITLE.to_string(),
                dots,
            },
            TEST_PATTERN_HOLD,
        ),
        Frame::new(DisplayDirective::banner(LABEL_TEST_OK), TEST_CONFIRM_HOLD),
        Frame::new(DisplayDirective::Clear, Duration::ZERO),
    ]
}

pub fn disconnect_frames() -> Vec<Frame> {
    vec![Frame::new(DisplayDirective::text(LABEL_DISCONNECTED), DISCONNECT_HOLD)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_frames_layout() {
        let frames = connect_frames();
        // 15 orbit + 26 bar + ready + clear
        assert_eq!(frames.len(), 15 + 26 + 2);
        assert_eq!(
            frames[14].directive,
            DisplayDirective::Connecting {
                frame: ConnectFrame::Orbit {
                    angle: 350,
                    dot: orbit_dot(350, CONNECT_ORBIT_RADIUS),
                    label: LABEL_CONNECTED.to_string(),
                }
            }
        );
        assert_eq!(
            frames[40].directive,
            DisplayDirective::Connecting {
                frame: ConnectFrame::Progress { width: 125 }
            }
        );
        assert_eq!(frames.last().unwrap().directive, DisplayDirective::Clear);

        let total: Duration = frames.iter().map(|f| f.hold).sum();
        assert_eq!(total, Duration::from_millis(15 * 25 + 26 * 8 + 500));
    }

    #[test]
    fn test_display_test_dots_in_bounds() {
        let mut rng = WyRand::new_seed(7);
        let frames = display_test_frames(&mut rng);
        assert_eq!(frames.len(), 3);

        let DisplayDirective::TestPattern { dots, .. } = &frames[0].directive else {
            panic!("first frame should be the test pattern");
        };
        assert_eq!(dots.len(), TEST_PATTERN_DOTS);
        for dot in dots {
            assert!((1..126).contains(&dot.x), "x out of bounds: {:?}", dot);
            assert!((11..52).contains(&dot.y), "y out of bounds: {:?}", dot);
        }
        assert_eq!(frames[0].hold, Duration::from_millis(1000));
        assert_eq!(frames[1].directive, DisplayDirective::banner(LABEL_TEST_OK));
        assert_eq!(frames[1].hold, Duration::from_millis(800));
        assert_eq!(frames[2].directive, DisplayDirective::Clear);
        assert_eq!(frames[2].hold, Duration::ZERO);
    }

    #[test]
    fn test_sequence_steps_by_time() {
        let t0 = Instant::now();
        let (mut seq, first) = Sequence::start(SequenceKind::Disconnect, disconnect_frames(), t0);
        assert_eq!(first, Some(DisplayDirective::text(LABEL_DISCONNECTED)));

        assert_eq!(seq.advance(t0 + Duration::from_millis(999)), Step::Hold);
        assert_eq!(
            seq.advance(t0 + Duration::from_millis(1000)),
            Step::Done(SequenceKind::Disconnect)
        );
    }

    #[test]
    fn test_sequence_shows_each_frame_once() {
        let t0 = Instant::now();
        let frames = vec![
            Frame::new(DisplayDirective::banner("a"), Duration::from_millis(10)),
            Frame::new(DisplayDirective::banner("b"), Duration::from_millis(10)),
        ];
        let (mut seq, first) = Sequence::start(SequenceKind::DisplayTest, frames, t0);
        assert_eq!(first, Some(DisplayDirective::banner("a")));
        assert_eq!(seq.remaining(), 1);

        let t1 = t0 + Duration::from_millis(10);
        assert_eq!(seq.advance(t1), Step::Show(DisplayDirective::banner("b")));
        assert_eq!(seq.advance(t1), Step::Hold);
        assert_eq!(
            seq.advance(t1 + Duration::from_millis(10)),
            Step::Done(SequenceKind::DisplayTest)
        );
    }
}
