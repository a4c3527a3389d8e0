//! Downstream Synthesizers
//!
//! Independent consumers of the requirement set: user-story generation and
//! tool recommendation. Both require a non-empty set and never write back
//! to the conversation.

pub mod stories;
pub mod tools;

pub use stories::{StoryGenerator, UserStory};
pub use tools::{ToolRecommendation, ToolRecommender};
