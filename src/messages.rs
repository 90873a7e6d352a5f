//! Message contracts between the engine and its panels
//!
//! Outbound: one `StatsMessage` per inspection. Inbound: the highlight
//! request. The transport itself is out of scope; messages are plain JSON.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

use crate::assembler::inspect_page;
use crate::config::InspectConfig;
use crate::errors::{InspectError, InspectResult};
use crate::highlight::{HighlightOutcome, HighlightTarget, highlight_image};
use crate::page_source::PageSource;
use crate::report::PageReport;

/// Report delivered to the panels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsMessage {
    pub stats: PageReport,
}

/// Requests the panels send to the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum InboundMessage {
    /// `{"action": "highlightImage", "source": "<url>"}`
    HighlightImage {
        #[serde(alias = "src")]
        source: String,
    },
}

impl InboundMessage {
    /// Parse a raw message; unknown actions and malformed JSON yield `None`
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match serde_json::from_str(raw) {
            Ok(message) => Some(message),
            Err(e) => {
                log::debug!("Ignoring inbound message: {e}");
                None
            }
        }
    }
}

/// A pending inspection
///
/// Wraps a oneshot receiver and implements Future so it can be awaited.
/// Resolves exactly once, after the settle delay.
pub struct ReportRequest {
    receiver: oneshot::Receiver<InspectResult<StatsMessage>>,
}

impl ReportRequest {
    #[must_use]
    pub fn new(receiver: oneshot::Receiver<InspectResult<StatsMessage>>) -> Self {
        Self { receiver }
    }
}

impl Future for ReportRequest {
    type Output = InspectResult<StatsMessage>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(_)) => Poll::Ready(Err(InspectError::Cancelled)),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Start an inspection in the background
#[must_use]
pub fn spawn_inspection<S>(source: Arc<S>, config: InspectConfig) -> ReportRequest
where
    S: PageSource + ?Sized + 'static,
{
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let result = inspect_page(source.as_ref(), &config)
            .await
            .map(|stats| StatsMessage { stats });
        if tx.send(result).is_err() {
            log::debug!("Inspection finished after its requester went away");
        }
    });

    ReportRequest::new(rx)
}

/// Handle one raw inbound message
///
/// Nothing is sent back to the requester. The highlight outcome is returned
/// for local callers; unknown messages and failed highlights yield `None`.
pub async fn dispatch_inbound<T>(
    target: Arc<T>,
    raw: &str,
    config: &InspectConfig,
) -> Option<HighlightOutcome>
where
    T: HighlightTarget + 'static,
{
    match InboundMessage::parse(raw)? {
        InboundMessage::HighlightImage { source } => {
            match highlight_image(target, &source, config.highlight_duration()).await {
                Ok(outcome) => Some(outcome),
                Err(e) => {
                    log::warn!("Highlight of {source} failed: {e}");
                    None
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_highlight_with_either_key() {
        let expected = InboundMessage::HighlightImage {
            source: "https://x.test/a.png".into(),
        };
        assert_eq!(
            InboundMessage::parse(r#"{"action":"highlightImage","source":"https://x.test/a.png"}"#),
            Some(expected.clone())
        );
        assert_eq!(
            InboundMessage::parse(r#"{"action":"highlightImage","src":"https://x.test/a.png"}"#),
            Some(expected)
        );
    }

    #[test]
    fn test_unknown_and_malformed_are_ignored() {
        assert_eq!(InboundMessage::parse(r#"{"action":"reload"}"#), None);
        assert_eq!(InboundMessage::parse(r#"{"action":"highlightImage"}"#), None);
        assert_eq!(InboundMessage::parse("not json"), None);
    }

    #[test]
    fn test_serialize_highlight() {
        let message = InboundMessage::HighlightImage {
            source: "a.png".into(),
        };
        assert_eq!(
            serde_json::to_string(&message).unwrap(),
            r#"{"action":"highlightImage","source":"a.png"}"#
        );
    }
}
