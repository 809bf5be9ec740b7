//! Narrative module - everything between the aggregate and a renderer.
//!
//! - `tokenize` - markup text into typed tokens
//! - `compose` - fallback markup built from the structured sections
//! - `build_prompt` - generation request text
//! - `filename_base` - export filename derivation

mod composer;
mod filename;
mod prompt;
mod tokenizer;

pub use composer::{compose, EMPTY_SECTION_PLACEHOLDER};
pub use filename::{filename_base, DEFAULT_FILENAME_BASE};
pub use prompt::build_prompt;
pub use tokenizer::{tokenize, Token};

use std::borrow::Cow;

use crate::domain::biography::BiographyAggregate;

/// Returns the text a renderer should consume for `aggregate`.
///
/// A stored draft always wins; otherwise the composed fallback is used.
pub fn narrative_markup(aggregate: &BiographyAggregate) -> Cow<'_, str> {
    match aggregate.narrative_draft() {
        Some(draft) => Cow::Borrowed(draft),
        None => Cow::Owned(compose(aggregate)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::biography::Voice;
    use crate::domain::foundation::UserId;

    #[test]
    fn draft_wins_over_sections() {
        let mut bio = BiographyAggregate::new(UserId::new("u").unwrap());
        assert!(narrative_markup(&bio).starts_with("# Autobiography"));

        bio.record_generated_story("# Drafted", Voice::Simple);
        assert_eq!(narrative_markup(&bio), "# Drafted");
    }
}
