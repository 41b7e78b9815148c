//! Conversational session domain.
//!
//! - `session` - the chat session aggregate with history and recommendation cursor
//! - `fields` - intake field map, override merge, and alias probing
//! - `synthesizer` - rule-based replies used when the model is unavailable
//! - `splicer` - formats recommendation batches into replies
//! - `prompt` - system prompt for the remote model

mod fields;
mod money;
mod prompt;
mod session;
mod splicer;
pub mod synthesizer;

pub use fields::{
    is_discriminating_field, is_empty_value, IntakeFields, AGE_FIELD_ALIASES,
    CATEGORY_FIELD_ALIASES, GENDER_FIELD_ALIASES, LOCATION_FIELD_ALIASES, NAME_FIELD_ALIASES,
};
pub use money::format_inr;
pub use prompt::{build_system_prompt, PROMPT_PRODUCT_LIMIT};
pub use session::{ChatSession, FormMerge, Turn, TurnRole};
pub use splicer::{append_recommendations, format_product_line, SpliceOptions};
pub use synthesizer::{GreetingInput, ReplyBucket, ReplyInput};
