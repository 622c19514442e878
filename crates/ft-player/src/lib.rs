//! Test playback: session state machine, scoring, and review.

pub mod score;
pub mod session;

pub use score::{BoxReview, BoxVerdict, FrameReview, HotspotVerdict, InputVerdict, Score, answers_match};
pub use session::{Effects, FrameAnswers, Progress, SessionAction, SessionEffect, TestSession, reduce};
