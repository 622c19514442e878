//! Scoring and review verdicts.
//!
//! Both are pure functions of the frame snapshot and the answer state, so
//! they can be recomputed at any point of a session with the same result.

use crate::session::FrameAnswers;
use ft_core::{BoxId, BoxKind, Frame};
use serde::Serialize;

/// Result of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Score {
    pub score: usize,
    /// One per input field plus one per hotspot, across all frames.
    pub total_possible: usize,
    /// Frames with hotspots where the taker made a mistake.
    pub mistake_frames: usize,
}

/// Answers compare equal ignoring case and surrounding whitespace.
/// Inner whitespace must match exactly.
pub fn answers_match(answer: &str, expected: &str) -> bool {
    answer.trim().to_lowercase() == expected.trim().to_lowercase()
}

pub fn score(frames: &[Frame], answers: &[FrameAnswers]) -> Score {
    let mut s = Score::default();
    for (frame, a) in frames.iter().zip(answers) {
        for b in frame.input_fields() {
            s.total_possible += 1;
            if answers_match(a.input(b.id), b.expected().unwrap_or_default()) {
                s.score += 1;
            }
        }

        let hotspots = frame.hotspot_count();
        if hotspots == 0 {
            continue;
        }
        s.total_possible += hotspots;
        if a.mistake {
            // A mistake forfeits every hotspot on the frame.
            s.mistake_frames += 1;
        } else {
            s.score += frame.hotspots().filter(|h| a.is_clicked(h.id)).count();
        }
    }
    s
}

// ─── Review ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputVerdict {
    Correct,
    /// Correct because nothing was expected and nothing was typed.
    CorrectEmpty,
    Incorrect,
    /// Incorrect and left blank.
    IncorrectEmpty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HotspotVerdict {
    Clicked,
    Missed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BoxVerdict {
    InputField {
        verdict: InputVerdict,
        answer: String,
        expected: String,
    },
    Hotspot {
        verdict: HotspotVerdict,
        order: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoxReview {
    pub id: BoxId,
    pub label: String,
    #[serde(flatten)]
    pub verdict: BoxVerdict,
}

/// Everything the review screen shows for one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameReview {
    pub index: usize,
    pub mistake: bool,
    pub boxes: Vec<BoxReview>,
}

pub fn input_verdict(answer: &str, expected: &str) -> InputVerdict {
    let blank = answer.trim().is_empty();
    match (answers_match(answer, expected), blank) {
        (true, true) => InputVerdict::CorrectEmpty,
        (true, false) => InputVerdict::Correct,
        (false, true) => InputVerdict::IncorrectEmpty,
        (false, false) => InputVerdict::Incorrect,
    }
}

pub fn review_frame(index: usize, frame: &Frame, answers: &FrameAnswers) -> FrameReview {
    let boxes = frame
        .boxes
        .iter()
        .map(|b| {
            let verdict = match b.kind() {
                BoxKind::InputField { expected } => {
                    let answer = answers.input(b.id);
                    BoxVerdict::InputField {
                        verdict: input_verdict(answer, expected),
                        answer: answer.to_string(),
                        expected: expected.clone(),
                    }
                }
                BoxKind::Hotspot { order } => BoxVerdict::Hotspot {
                    verdict: if answers.is_clicked(b.id) {
                        HotspotVerdict::Clicked
                    } else {
                        HotspotVerdict::Missed
                    },
                    order: *order,
                },
            };
            BoxReview {
                id: b.id,
                label: b.label.clone(),
                verdict,
            }
        })
        .collect();

    FrameReview {
        index,
        mistake: answers.mistake,
        boxes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ft_core::{FrameBox, FrameImage, PercentRect};
    use pretty_assertions::assert_eq;

    const R: PercentRect = PercentRect::new(0.0, 0.0, 10.0, 10.0);

    #[test]
    fn matching_ignores_case_and_outer_whitespace() {
        assert!(answers_match("  brent crude ", "Brent Crude"));
        assert!(!answers_match("Brent  Crude", "Brent Crude"));
        assert!(answers_match("   ", ""));
        assert!(answers_match("ÉTÉ", "été"));
    }

    #[test]
    fn verdicts_cover_blank_answers() {
        assert_eq!(input_verdict("", ""), InputVerdict::CorrectEmpty);
        assert_eq!(input_verdict("x", "X"), InputVerdict::Correct);
        assert_eq!(input_verdict(" ", "x"), InputVerdict::IncorrectEmpty);
        assert_eq!(input_verdict("y", ""), InputVerdict::Incorrect);
    }

    #[test]
    fn mistake_frame_forfeits_hotspots_but_not_inputs() {
        let mut frame = Frame::new(FrameImage::new(Vec::new()), 10, 10);
        let h = BoxId::intern("score-h");
        let i = BoxId::intern("score-i");
        frame.boxes.push(FrameBox::hotspot(h, R, "h", 1));
        frame.boxes.push(FrameBox::input_field(i, R, "i", "ok"));

        let mut answers = FrameAnswers::default();
        answers.hotspots_clicked.insert(h, true);
        answers.inputs.insert(i, "OK".into());
        let clean = score(std::slice::from_ref(&frame), std::slice::from_ref(&answers));
        assert_eq!(
            clean,
            Score {
                score: 2,
                total_possible: 2,
                mistake_frames: 0
            }
        );

        answers.mistake = true;
        let spoiled = score(std::slice::from_ref(&frame), std::slice::from_ref(&answers));
        assert_eq!(
            spoiled,
            Score {
                score: 1,
                total_possible: 2,
                mistake_frames: 1
            }
        );
    }

    #[test]
    fn review_lists_boxes_in_creation_order() {
        let mut frame = Frame::new(FrameImage::new(Vec::new()), 10, 10);
        let i = BoxId::intern("review-i");
        let h = BoxId::intern("review-h");
        frame.boxes.push(FrameBox::input_field(i, R, "name", "Ada"));
        frame.boxes.push(FrameBox::hotspot(h, R, "ok", 1));

        let mut answers = FrameAnswers::default();
        answers.inputs.insert(i, "ada ".into());
        let review = review_frame(0, &frame, &answers);

        assert_eq!(review.boxes.len(), 2);
        assert_eq!(
            review.boxes[0].verdict,
            BoxVerdict::InputField {
                verdict: InputVerdict::Correct,
                answer: "ada ".into(),
                expected: "Ada".into(),
            }
        );
        assert_eq!(
            review.boxes[1].verdict,
            BoxVerdict::Hotspot {
                verdict: HotspotVerdict::Missed,
                order: 1
            }
        );
    }
}
