//! Variant generation: base prompt in, one rewrite per technique out.

use crate::errors::RunError;
use crate::model::{Technique, Variant};
use crate::templates;

/// Rewrite `base_prompt` with every technique, in [`Technique::ALL`] order.
///
/// Pure and deterministic. Fails only when the prompt is empty or whitespace.
pub fn generate_variants(base_prompt: &str) -> Result<Vec<Variant>, RunError> {
    if base_prompt.trim().is_empty() {
        return Err(RunError::invalid_input("empty prompt"));
    }
    Ok(Technique::ALL
        .iter()
        .map(|technique| Variant {
            technique: *technique,
            text: apply(*technique, base_prompt),
        })
        .collect())
}

/// Apply a single technique's template.
pub fn apply(technique: Technique, prompt: &str) -> String {
    match technique {
        Technique::FewShot => format!(
            "{}{}{}",
            templates::FEW_SHOT_PREFIX,
            prompt,
            templates::FEW_SHOT_SUFFIX
        ),
        Technique::ChainOfThought => format!("{}{}", prompt, templates::CHAIN_OF_THOUGHT_SUFFIX),
        Technique::StructuredOutput => {
            format!("{}{}", prompt, templates::STRUCTURED_OUTPUT_SUFFIX)
        }
        Technique::RoleBased => format!(
            "{}{}{}",
            templates::ROLE_BASED_PREFIX,
            prompt,
            templates::ROLE_BASED_SUFFIX
        ),
        Technique::Concise => format!("{}{}", prompt, templates::CONCISE_SUFFIX),
    }
}
