//! Per-turn route selection.
//!
//! The classifier proposes a route; attachments on the latest message can
//! override it, and a classifier failure falls back to attachment detection
//! alone. Priority in both cases is image, then PDF, then chat.

pub mod attachments;
pub mod classifier;
pub mod context;

use tracing::{info, warn};

use switchboard_types::message::Message;
use switchboard_types::route::{Route, RouteSelection, RouteSource};

use self::attachments::{ScannedMessage, scan_attachments};
use self::classifier::{ClassifierInput, RouteClassifier};
use self::context::recent_context;

/// Chooses the handler for each turn.
pub struct Router<C: RouteClassifier> {
    classifier: C,
}

impl<C: RouteClassifier> Router<C> {
    pub fn new(classifier: C) -> Self {
        Self { classifier }
    }

    /// Select a route for `history`, whose last element is the new user message.
    pub async fn select(&self, history: &[Message]) -> RouteSelection {
        let scanned = history
            .last()
            .map(|message| scan_attachments(&message.content))
            .unwrap_or_default();

        let input = ClassifierInput {
            message_text: scanned.text.clone(),
            history: recent_context(history),
        };

        let selection = match self.classifier.classify(&input).await {
            Ok(decision) => apply_override(decision.route, decision.reasoning, &scanned),
            Err(e) => {
                warn!(error = %e, "route classifier failed, using attachment fallback");
                RouteSelection {
                    route: fallback_route(&scanned),
                    source: RouteSource::Fallback,
                    reasoning: format!("classifier unavailable: {e}"),
                }
            }
        };

        match selection.source {
            RouteSource::Classifier => info!(
                route = %selection.route,
                source = %selection.source,
                reasoning = %selection.reasoning,
                "route selected"
            ),
            RouteSource::Override | RouteSource::Fallback => warn!(
                route = %selection.route,
                source = %selection.source,
                reasoning = %selection.reasoning,
                "route selected"
            ),
        }

        selection
    }
}

/// The route attachments force, if any.
fn forced_route(scanned: &ScannedMessage) -> Option<Route> {
    if scanned.has_image {
        Some(Route::Vision)
    } else if scanned.has_pdf {
        Some(Route::Pdf)
    } else {
        None
    }
}

fn apply_override(route: Route, reasoning: String, scanned: &ScannedMessage) -> RouteSelection {
    match forced_route(scanned) {
        Some(forced) if forced != route => RouteSelection {
            route: forced,
            source: RouteSource::Override,
            reasoning: format!("attachment forces {forced} (classifier chose {route}: {reasoning})"),
        },
        _ => RouteSelection {
            route,
            source: RouteSource::Classifier,
            reasoning,
        },
    }
}

fn fallback_route(scanned: &ScannedMessage) -> Route {
    forced_route(scanned).unwrap_or(Route::Chat)
}
