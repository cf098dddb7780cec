//! Intent routing: which of the six response types should answer a message.
//!
//! Two interchangeable routers implement [`IntentRouter`]:
//!
//! - [`LexicalRouter`] — pattern tables and an intent-scoring fallback, no
//!   model call. The default.
//! - [`ModelRouter`] — asks the configured text generator to pick the type.
//!
//! Routing never fails. Whatever goes wrong inside a router, the caller gets
//! a valid [`RoutingDecision`]; the worst case is the teach fallback.

use std::sync::Arc;

use async_trait::async_trait;
use biotutor_config::RouterConfig;
use biotutor_core::{RoutingDecision, TextGenerator};

pub mod lexical;
pub mod model;

pub use lexical::LexicalRouter;
pub use model::ModelRouter;

/// A strategy for turning one user message into a routing decision.
#[async_trait]
pub trait IntentRouter: Send + Sync {
    /// A short name for logs ("lexical", "model").
    fn name(&self) -> &str;

    /// Route a query. Must not fail: implementations catch internal errors
    /// and fall back to [`RoutingDecision::fallback`].
    async fn route(&self, query: &str) -> RoutingDecision;
}

/// Build the router selected by configuration.
///
/// `router.strategy` has already been validated, so anything other than
/// "model" gets the lexical router.
pub fn build_from_config(
    config: &RouterConfig,
    generator: Arc<dyn TextGenerator>,
) -> Arc<dyn IntentRouter> {
    match config.strategy.as_str() {
        "model" => Arc::new(ModelRouter::new(generator)),
        _ => Arc::new(LexicalRouter::new()),
    }
}
