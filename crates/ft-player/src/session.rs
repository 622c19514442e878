//! Test session reducer.
//!
//! A [`TestSession`] is started from a snapshot of the included frames and
//! owns all taker state: typed answers, correctly clicked hotspots, the
//! sequence position and the sticky mistake flag per frame. Every taker
//! action goes through [`TestSession::apply`] (or the pure [`reduce`]),
//! which updates the state atomically and returns the [`SessionEffect`]s
//! the host should perform: feedback flashes and delayed auto-advances.
//!
//! Timers are owned by the host. When a scheduled advance elapses the host
//! feeds back [`SessionAction::AdvanceTimerFired`]; it only takes effect if
//! the session is still on the frame that scheduled it.

use crate::score::{FrameReview, Score, review_frame, score};
use ft_core::hit::hit_box;
use ft_core::{BoxId, BoxKind, Frame, FtError, FtResult, NOTHING_TO_TEST, SessionConfig};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};
use std::collections::HashMap;
use std::sync::Arc;

// ─── Actions & effects ───────────────────────────────────────────────────

/// Something the taker (or a host timer) did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionAction {
    /// The text of an input field changed. Stored raw.
    InputChanged { id: BoxId, text: String },
    /// An input field lost focus.
    InputBlurred { id: BoxId },
    HotspotClicked { id: BoxId },
    /// A click on the frame that hit neither a hotspot nor an input field.
    BackgroundClicked,
    /// A click at a percent position; hit-tested against the current frame.
    ClickAt { x: f64, y: f64 },
    Next,
    Previous,
    /// A [`SessionEffect::ScheduleAdvance`] delay elapsed.
    AdvanceTimerFired { from_frame: usize },
}

/// Something the host should do in response to an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEffect {
    CorrectHotspot { id: BoxId, clear_after_ms: u32 },
    IncorrectHotspot { id: BoxId, clear_after_ms: u32 },
    /// Off-target click on a frame with hotspots.
    MistakeFlash { clear_after_ms: u32 },
    /// Feed back `AdvanceTimerFired { from_frame }` after `delay_ms`.
    ScheduleAdvance { from_frame: usize, delay_ms: u32 },
    FrameChanged { index: usize },
    EnteredReview,
}

pub type Effects = SmallVec<[SessionEffect; 2]>;

// ─── State ───────────────────────────────────────────────────────────────

/// Taker state for one frame.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FrameAnswers {
    pub inputs: HashMap<BoxId, String>,
    pub hotspots_clicked: HashMap<BoxId, bool>,
    /// Highest hotspot order clicked in sequence so far.
    pub last_correct_order: u32,
    /// Set on the first wrong or off-target click. Never cleared.
    pub mistake: bool,
}

impl FrameAnswers {
    /// The stored text for an input field, empty if never typed.
    pub fn input(&self, id: BoxId) -> &str {
        self.inputs.get(&id).map(String::as_str).unwrap_or_default()
    }

    pub fn is_clicked(&self, id: BoxId) -> bool {
        self.hotspots_clicked.get(&id).copied().unwrap_or(false)
    }
}

/// Position within a session, for the host's progress display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    /// 1-based number of the displayed frame.
    pub frame: usize,
    pub of: usize,
    pub reviewing: bool,
}

#[derive(Debug, Clone)]
pub struct TestSession {
    frames: Arc<[Frame]>,
    answers: Vec<FrameAnswers>,
    current: usize,
    reviewing: bool,
    config: SessionConfig,
}

impl TestSession {
    /// Start a session over the included frames of `frames`.
    ///
    /// The frames are copied, so later authoring edits do not reach the
    /// session. Hotspot orders are renumbered per frame to `1..=n`, keeping
    /// their relative order (ties broken by creation order).
    pub fn start(frames: &[Frame], config: SessionConfig) -> FtResult<Self> {
        let snapshot: Vec<Frame> = frames
            .iter()
            .filter(|f| f.include_in_test)
            .cloned()
            .map(normalize_orders)
            .collect();
        if snapshot.is_empty() {
            return Err(FtError::validation(NOTHING_TO_TEST));
        }
        log::debug!("session started with {} frames", snapshot.len());

        Ok(Self {
            answers: vec![FrameAnswers::default(); snapshot.len()],
            frames: snapshot.into(),
            current: 0,
            reviewing: false,
            config,
        })
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_frame(&self) -> &Frame {
        &self.frames[self.current]
    }

    pub fn answers(&self, index: usize) -> Option<&FrameAnswers> {
        self.answers.get(index)
    }

    pub fn current_answers(&self) -> &FrameAnswers {
        &self.answers[self.current]
    }

    pub fn is_reviewing(&self) -> bool {
        self.reviewing
    }

    pub fn progress(&self) -> Progress {
        Progress {
            frame: self.current + 1,
            of: self.frames.len(),
            reviewing: self.reviewing,
        }
    }

    pub fn score(&self) -> Score {
        score(&self.frames, &self.answers)
    }

    /// Verdicts for the displayed frame. Only available while reviewing.
    pub fn review(&self) -> Option<FrameReview> {
        self.reviewing
            .then(|| review_frame(self.current, self.current_frame(), self.current_answers()))
    }

    /// Apply one action. Never fails: actions that do not apply to the
    /// current state are ignored.
    pub fn apply(&mut self, action: SessionAction) -> Effects {
        log::trace!("frame {}: {action:?}", self.current);
        match action {
            SessionAction::Next => self.next(),
            SessionAction::Previous => self.previous(),
            SessionAction::AdvanceTimerFired { from_frame } => {
                if self.reviewing || from_frame != self.current {
                    log::trace!("stale advance from frame {from_frame}");
                    return Effects::new();
                }
                self.next()
            }
            // Scoring-affecting actions are frozen during review.
            _ if self.reviewing => Effects::new(),
            SessionAction::InputChanged { id, text } => {
                if self.is_input(id) {
                    self.answers[self.current].inputs.insert(id, text);
                }
                Effects::new()
            }
            SessionAction::InputBlurred { id } => self.input_blurred(id),
            SessionAction::HotspotClicked { id } => self.hotspot_clicked(id),
            SessionAction::BackgroundClicked => self.background_clicked(),
            SessionAction::ClickAt { x, y } => {
                let hit = hit_box(self.current_frame(), Point::new(x, y))
                    .map(|b| (b.id, b.is_hotspot()));
                match hit {
                    Some((id, true)) => self.hotspot_clicked(id),
                    Some((_, false)) => Effects::new(),
                    None => self.background_clicked(),
                }
            }
        }
    }

    // ─── Transitions ─────────────────────────────────────────────────────

    fn next(&mut self) -> Effects {
        if self.current + 1 < self.frames.len() {
            self.current += 1;
            smallvec![SessionEffect::FrameChanged {
                index: self.current
            }]
        } else if !self.reviewing {
            self.reviewing = true;
            log::debug!("entered review: {:?}", self.score());
            smallvec![SessionEffect::EnteredReview]
        } else {
            Effects::new()
        }
    }

    fn previous(&mut self) -> Effects {
        if self.current == 0 {
            return Effects::new();
        }
        self.current -= 1;
        smallvec![SessionEffect::FrameChanged {
            index: self.current
        }]
    }

    fn is_input(&self, id: BoxId) -> bool {
        self.current_frame().get(id).is_some_and(|b| b.is_input_field())
    }

    fn input_blurred(&self, id: BoxId) -> Effects {
        let frame = self.current_frame();
        if !self.is_input(id) || !frame.is_input_only() {
            return Effects::new();
        }
        let answers = self.current_answers();
        let all_filled = frame
            .input_fields()
            .all(|b| !answers.input(b.id).trim().is_empty());
        if !all_filled {
            return Effects::new();
        }
        smallvec![SessionEffect::ScheduleAdvance {
            from_frame: self.current,
            delay_ms: self.config.input_advance_delay_ms,
        }]
    }

    fn hotspot_clicked(&mut self, id: BoxId) -> Effects {
        let frame = &self.frames[self.current];
        let Some(BoxKind::Hotspot { order }) = frame.get(id).map(|b| b.kind()) else {
            return Effects::new();
        };
        let order = *order;
        let last = frame.hotspot_count() as u32;
        let answers = &mut self.answers[self.current];

        if order != answers.last_correct_order + 1 {
            log::debug!("frame {}: hotspot {order} out of turn", self.current);
            answers.mistake = true;
            return smallvec![SessionEffect::IncorrectHotspot {
                id,
                clear_after_ms: self.config.mistake_flash_ms,
            }];
        }

        answers.hotspots_clicked.insert(id, true);
        answers.last_correct_order = order;
        let mut effects: Effects = smallvec![SessionEffect::CorrectHotspot {
            id,
            clear_after_ms: self.config.correct_flash_ms,
        }];
        if order == last {
            effects.push(SessionEffect::ScheduleAdvance {
                from_frame: self.current,
                delay_ms: self.config.advance_delay_ms,
            });
        }
        effects
    }

    fn background_clicked(&mut self) -> Effects {
        if !self.current_frame().has_hotspots() {
            return Effects::new();
        }
        self.answers[self.current].mistake = true;
        smallvec![SessionEffect::MistakeFlash {
            clear_after_ms: self.config.mistake_flash_ms,
        }]
    }
}

/// `(state, action) → (state', effects)`.
pub fn reduce(mut session: TestSession, action: SessionAction) -> (TestSession, Effects) {
    let effects = session.apply(action);
    (session, effects)
}

/// Renumber a frame's hotspots to dense ranks `1..=n`.
fn normalize_orders(mut frame: Frame) -> Frame {
    let mut ranked: Vec<(u32, usize, BoxId)> = frame
        .boxes
        .iter()
        .enumerate()
        .filter_map(|(i, b)| b.order().map(|o| (o, i, b.id)))
        .collect();
    ranked.sort_unstable_by_key(|&(order, index, _)| (order, index));
    for (rank, (_, _, id)) in ranked.into_iter().enumerate() {
        if let Some(b) = frame.get_mut(id) {
            b.set_order(rank as u32 + 1);
        }
    }
    frame
}

#[cfg(test)]
mod tests {
    use super::*;
    use ft_core::{FrameBox, FrameImage, PercentRect};
    use pretty_assertions::assert_eq;

    fn frame(boxes: Vec<FrameBox>) -> Frame {
        let mut f = Frame::new(FrameImage::new(Vec::new()), 640, 360);
        f.boxes = boxes;
        f
    }

    fn hotspot(name: &str, x: f64, order: u32) -> FrameBox {
        FrameBox::hotspot(
            BoxId::intern(name),
            PercentRect::new(x, 10.0, 10.0, 10.0),
            name,
            order,
        )
    }

    #[test]
    fn start_skips_excluded_frames() {
        let mut excluded = frame(vec![]);
        excluded.include_in_test = false;
        let kept = frame(vec![hotspot("start-a", 0.0, 1)]);
        let session = TestSession::start(&[excluded, kept.clone()], SessionConfig::default()).unwrap();
        assert_eq!(session.frames().len(), 1);
        assert_eq!(session.current_frame().id, kept.id);
    }

    #[test]
    fn start_without_included_frames_fails() {
        let mut f = frame(vec![]);
        f.include_in_test = false;
        let err = TestSession::start(&[f], SessionConfig::default()).unwrap_err();
        assert_eq!(err.to_string(), NOTHING_TO_TEST);
    }

    #[test]
    fn orders_are_renumbered_densely() {
        let f = frame(vec![
            hotspot("dense-a", 0.0, 5),
            hotspot("dense-b", 20.0, 2),
            hotspot("dense-c", 40.0, 5),
        ]);
        let session = TestSession::start(&[f], SessionConfig::default()).unwrap();
        let orders: Vec<_> = session
            .current_frame()
            .boxes
            .iter()
            .map(|b| b.order().unwrap())
            .collect();
        assert_eq!(orders, vec![2, 1, 3]);
    }

    #[test]
    fn click_at_routes_by_hit() {
        let input = FrameBox::input_field(
            BoxId::intern("click-i"),
            PercentRect::new(50.0, 50.0, 20.0, 10.0),
            "i",
            "",
        );
        let f = frame(vec![hotspot("click-h", 0.0, 1), input]);
        let mut session = TestSession::start(&[f], SessionConfig::default()).unwrap();

        // Inside the input field: nothing happens.
        assert!(session.apply(SessionAction::ClickAt { x: 55.0, y: 55.0 }).is_empty());
        assert!(!session.current_answers().mistake);

        let effects = session.apply(SessionAction::ClickAt { x: 5.0, y: 15.0 });
        assert_eq!(effects[0], SessionEffect::CorrectHotspot {
            id: BoxId::intern("click-h"),
            clear_after_ms: 300,
        });

        // Bare frame: off-target mistake.
        let effects = session.apply(SessionAction::ClickAt { x: 90.0, y: 90.0 });
        assert_eq!(effects.as_slice(), &[SessionEffect::MistakeFlash { clear_after_ms: 700 }]);
        assert!(session.current_answers().mistake);
    }

    #[test]
    fn stale_timer_is_dropped() {
        let f1 = frame(vec![hotspot("stale-a", 0.0, 1)]);
        let f2 = frame(vec![hotspot("stale-b", 0.0, 1)]);
        let mut session = TestSession::start(&[f1, f2], SessionConfig::default()).unwrap();

        session.apply(SessionAction::HotspotClicked {
            id: BoxId::intern("stale-a"),
        });
        // Taker navigates manually before the timer fires.
        session.apply(SessionAction::Next);
        assert!(
            session
                .apply(SessionAction::AdvanceTimerFired { from_frame: 0 })
                .is_empty()
        );
        assert_eq!(session.current_index(), 1);
    }

    #[test]
    fn actions_serialize_tagged() {
        let json = serde_json::to_string(&SessionAction::ClickAt { x: 1.0, y: 2.0 }).unwrap();
        assert_eq!(json, r#"{"type":"click_at","x":1.0,"y":2.0}"#);
        let back: SessionAction = serde_json::from_str(r#"{"type":"next"}"#).unwrap();
        assert_eq!(back, SessionAction::Next);
    }
}
