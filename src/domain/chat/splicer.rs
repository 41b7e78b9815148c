//! Formats recommendation batches into reply annotations.

use crate::domain::catalog::Product;

use super::money::format_inr;

const SINGLE_INTRO: &str = "Here is a plan that fits your profile:";
const PLURAL_INTRO: &str = "Here are a couple of plans that fit your profile:";
const FOLLOW_UP: &str =
    "Would you like more details on any of these, or should I narrow the options down further?";

/// Options for one splice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpliceOptions {
    pub include_follow_up: bool,
    pub count: usize,
}

impl SpliceOptions {
    /// Splice up to `count` products, followed by the closing question.
    pub fn with_follow_up(count: usize) -> Self {
        Self {
            include_follow_up: true,
            count,
        }
    }

    /// Splice up to `count` products without a closing question.
    pub fn without_follow_up(count: usize) -> Self {
        Self {
            include_follow_up: false,
            count,
        }
    }
}

/// One bullet line for a product.
pub fn format_product_line(product: &Product) -> String {
    let mut line = format!("- {}", product.name);
    if let Some(provider) = non_blank(product.provider_name.as_deref()) {
        line.push_str(&format!(" by {}", provider));
    }
    line.push_str(&format!(": {}/year", format_inr(product.premium_amount)));
    if let Some(coverage) = non_blank(product.coverage_details.as_deref()) {
        line.push_str(&format!(" ({})", coverage));
    }
    line
}

/// Appends `batch` to `base`.
///
/// Returns `base` untouched when it is blank or the batch is empty.
pub fn append_recommendations(base: &str, batch: &[Product], include_follow_up: bool) -> String {
    if base.trim().is_empty() || batch.is_empty() {
        return base.to_string();
    }

    let intro = if batch.len() == 1 {
        SINGLE_INTRO
    } else {
        PLURAL_INTRO
    };

    let mut message = String::from(base.trim_end());
    message.push_str("\n\n");
    message.push_str(intro);
    for product in batch {
        message.push('\n');
        message.push_str(&format_product_line(product));
    }
    if include_follow_up {
        message.push_str("\n\n");
        message.push_str(FOLLOW_UP);
    }
    message
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
