//! RecommendationSelector - Keeps a session's product list fresh and hands
//! out non-repeating batches of it.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::catalog::ProductQuery;
use crate::domain::chat::{append_recommendations, ChatSession, SpliceOptions};
use crate::ports::ProductCatalog;

/// Selects catalog products for a session.
pub struct RecommendationSelector {
    catalog: Arc<dyn ProductCatalog>,
}

impl RecommendationSelector {
    pub fn new(catalog: Arc<dyn ProductCatalog>) -> Self {
        Self { catalog }
    }

    /// Reloads the session's recommendations from the catalog.
    ///
    /// Does nothing when the context names no insurance category, or when
    /// `force` is false and a list is already cached. A catalog failure
    /// leaves the session with an empty list. Returns whether the list was
    /// replaced.
    pub async fn refresh(&self, session: &mut ChatSession, force: bool) -> bool {
        let Some(category) = session.context().insurance_category() else {
            debug!(
                session_id = %session.id(),
                "No insurance category yet, skipping recommendations"
            );
            return false;
        };

        if !force && !session.product_recommendations().is_empty() {
            return false;
        }

        let query = ProductQuery::new(category.product_type())
            .with_age(session.context().age())
            .with_gender(session.context().gender());

        let products = match self.catalog.get_products(&query).await {
            Ok(products) => products,
            Err(e) => {
                warn!(
                    session_id = %session.id(),
                    category = %query.category,
                    error = %e,
                    "Catalog lookup failed, continuing without recommendations"
                );
                Vec::new()
            }
        };

        debug!(
            session_id = %session.id(),
            category = %query.category,
            age = ?query.age,
            gender = ?query.gender,
            count = products.len(),
            "Recommendations refreshed"
        );
        session.replace_recommendations(products);
        true
    }

    /// Appends the session's next batch of products to `base`.
    ///
    /// A blank base is returned as-is without consuming any products.
    pub fn annotate(
        &self,
        session: &mut ChatSession,
        base: &str,
        options: SpliceOptions,
    ) -> String {
        if base.trim().is_empty() {
            return base.to_string();
        }
        let batch = session.next_batch(options.count);
        append_recommendations(base, &batch, options.include_follow_up)
    }
}
