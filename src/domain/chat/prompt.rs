//! System prompt construction for the remote model.

use crate::domain::catalog::Product;

use super::fields::IntakeFields;
use super::splicer::format_product_line;

/// Number of catalog products described in the system prompt.
pub const PROMPT_PRODUCT_LIMIT: usize = 3;

const ADVISOR_BRIEF: &str = "You are PolicyPal, a friendly insurance advisor chatting with a \
prospective customer. Keep replies short (under 120 words), warm and specific to the customer's \
details. Never invent prices or plans that are not listed below. If you do not know an answer, \
offer to connect the customer with a licensed agent.";

/// Builds the system prompt from the current context and catalog matches.
///
/// Rebuilt on every turn so the model always sees the latest merged context.
pub fn build_system_prompt(context: &IntakeFields, products: &[Product]) -> String {
    let mut prompt = String::from(ADVISOR_BRIEF);

    if let Some(category) = context.insurance_category() {
        prompt.push_str(&format!(
            "\n\nThe customer is shopping for {} insurance.",
            category.label()
        ));
    }

    let details: Vec<String> = context
        .as_map()
        .keys()
        .filter_map(|key| context.text(key).map(|value| format!("- {}: {}", key, value)))
        .collect();
    if !details.is_empty() {
        prompt.push_str("\n\nCustomer details:\n");
        prompt.push_str(&details.join("\n"));
    }

    if !products.is_empty() {
        prompt.push_str("\n\nMatching plans from our catalog (cheapest first):\n");
        let lines: Vec<String> = products
            .iter()
            .take(PROMPT_PRODUCT_LIMIT)
            .map(format_product_line)
            .collect();
        prompt.push_str(&lines.join("\n"));
    }

    prompt
}
