//! Scripted replay of a test session.
//!
//! A script is a JSON array of steps, for example:
//!
//! ```json
//! [
//!   { "step": "click", "x": 12.5, "y": 40.0 },
//!   { "step": "type", "input": 0, "text": "Brent Crude" },
//!   { "step": "blur", "input": 0 },
//!   { "step": "wait" },
//!   { "step": "next" }
//! ]
//! ```
//!
//! Click positions are percent of the frame. Inputs are addressed by their
//! index among the input fields of the frame shown at that step. `wait`
//! fires every auto-advance the session has scheduled so far.

use anyhow::{Context as _, Result};
use ft_core::BoxId;
use ft_player::{Effects, SessionAction, SessionEffect, TestSession};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    Click { x: f64, y: f64 },
    Type { input: usize, text: String },
    Blur { input: usize },
    Next,
    Prev,
    Wait,
}

pub fn parse(text: &str) -> Result<Vec<Step>> {
    serde_json::from_str(text).context("replay script is not a JSON array of steps")
}

/// A session driven by script steps, with host timers simulated.
pub struct Replay {
    session: TestSession,
    pending: Vec<usize>,
}

impl Replay {
    pub fn new(session: TestSession) -> Self {
        Self {
            session,
            pending: Vec::new(),
        }
    }

    pub fn session(&self) -> &TestSession {
        &self.session
    }

    /// Frames with an auto-advance still waiting to fire.
    pub fn pending(&self) -> &[usize] {
        &self.pending
    }

    pub fn run_all(&mut self, steps: &[Step]) -> Result<()> {
        for (n, step) in steps.iter().enumerate() {
            self.run(step)
                .with_context(|| format!("step {} ({step:?})", n + 1))?;
        }
        Ok(())
    }

    pub fn run(&mut self, step: &Step) -> Result<()> {
        let action = match step {
            Step::Click { x, y } => SessionAction::ClickAt { x: *x, y: *y },
            Step::Type { input, text } => SessionAction::InputChanged {
                id: self.input_id(*input)?,
                text: text.clone(),
            },
            Step::Blur { input } => SessionAction::InputBlurred {
                id: self.input_id(*input)?,
            },
            Step::Next => SessionAction::Next,
            Step::Prev => SessionAction::Previous,
            Step::Wait => {
                for from_frame in std::mem::take(&mut self.pending) {
                    let effects = self
                        .session
                        .apply(SessionAction::AdvanceTimerFired { from_frame });
                    self.observe(effects);
                }
                return Ok(());
            }
        };
        let effects = self.session.apply(action);
        self.observe(effects);
        Ok(())
    }

    fn input_id(&self, index: usize) -> Result<BoxId> {
        let frame = self.session.current_index();
        self.session
            .current_frame()
            .input_fields()
            .nth(index)
            .map(|b| b.id)
            .with_context(|| format!("frame {} has no input field #{index}", frame + 1))
    }

    fn observe(&mut self, effects: Effects) {
        for effect in effects {
            log::debug!("{effect:?}");
            if let SessionEffect::ScheduleAdvance { from_frame, .. } = effect {
                self.pending.push(from_frame);
            }
        }
    }
}
