//! Prompts sent to the external model
//!
//! Draft prompts describe a mapping for a human to review; the conversion
//! prompt asks for the converted document itself.

pub mod conversion_prompt;
pub mod draft_prompt;

pub use conversion_prompt::generate_conversion_prompt;
pub use draft_prompt::{generate_draft_prompt, generate_refinement_prompt, DRAFT_MARKER};
