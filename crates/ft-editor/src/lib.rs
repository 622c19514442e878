//! Authoring surface for frame tests.
//!
//! - [`project::Project`] owns the frame collection, selection, and notices.
//! - [`tools`] turns pointer gestures on bare surface into new boxes.
//! - [`manipulator`] drags and resizes existing boxes.
//! - [`input`] is the device-neutral pointer event vocabulary.

pub mod input;
pub mod manipulator;
pub mod project;
pub mod tools;

pub use input::{InputEvent, PointerButton, PointerSample};
pub use manipulator::{BoxManipulator, Handle};
pub use project::{BoxMutation, Notice, Project};
pub use tools::{SurfaceTool, Target, Tool};
