//! Response orchestrator: Gate -> Aggregate -> LocalResolve -> Generate.
//!
//! The pipeline is a pure composition of the other components plus one
//! top-level error boundary. It holds no mutable state across calls and
//! is constructed with explicit dependencies, so every stage can be
//! exercised with fakes. No error from any inner stage ever reaches the
//! caller: the worst outcome is `PipelineResult { success: false }` with
//! a fixed apology.

use crumb_backend::StorefrontBackend;
use crumb_core::domain::{PipelineResult, Session};
use crumb_core::errors::GenerativeError;
use tracing::{error, info, warn};

use crate::llm::GenerativeClient;
use crate::{context, gate, prompt, rules};

/// Canned redirect for messages the relevance gate rejects.
pub const OFF_TOPIC_REPLY: &str =
    "I can help with questions about our bakery - products, categories, prices, \
     and your orders. What would you like to know?";

/// The single user-facing apology for any generative failure. Logs carry
/// the cause-specific diagnostics; users see one stable sentence.
pub const APOLOGY_REPLY: &str =
    "Sorry, I'm having trouble answering right now. Please try again in a moment.";

/// Shown when no local rule matched and the generative fallback is not
/// configured. A normal condition, not a failure.
pub const FALLBACK_UNAVAILABLE_REPLY: &str =
    "I can answer questions about our products, categories and your orders, \
     but I can't go deeper than that right now.";

pub struct AssistantPipeline<B, G> {
    backend: B,
    generative: G,
}

impl<B, G> AssistantPipeline<B, G>
where
    B: StorefrontBackend,
    G: GenerativeClient,
{
    pub fn new(backend: B, generative: G) -> Self {
        Self { backend, generative }
    }

    /// The sole entry point. Resolves to a result in every case,
    /// including failure; callers never see a raw error.
    pub async fn send_message(&self, user_text: &str, session: &Session) -> PipelineResult {
        if !gate::is_in_domain(user_text) {
            info!(
                event_name = "assistant.pipeline.off_topic",
                "message rejected by relevance gate"
            );
            return PipelineResult::ok(OFF_TOPIC_REPLY);
        }

        let snapshot = context::build_context(&self.backend, session).await;

        if let Some(reply) = rules::resolve_locally(user_text, &snapshot, session) {
            info!(event_name = "assistant.pipeline.local_answer", "answered deterministically");
            return PipelineResult::ok(reply);
        }

        let system_prompt = prompt::build_system_prompt(session.is_authenticated, &snapshot);
        match self.generative.generate(&system_prompt, user_text).await {
            Ok(completion) => {
                info!(event_name = "assistant.pipeline.generative_answer", "answered generatively");
                PipelineResult::ok(completion)
            }
            Err(GenerativeError::NotConfigured) => {
                warn!(
                    event_name = "assistant.pipeline.generative_unconfigured",
                    "no generative fallback available, returning fixed fallback"
                );
                PipelineResult::ok(FALLBACK_UNAVAILABLE_REPLY)
            }
            Err(generative_error) => {
                error!(
                    event_name = "assistant.pipeline.generative_failed",
                    cause = generative_error.cause(),
                    shape_error = generative_error.is_shape_error(),
                    error = %generative_error,
                    "generative stage failed, returning apology"
                );
                PipelineResult::failed(APOLOGY_REPLY)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use crumb_backend::StorefrontBackend;
    use crumb_core::domain::{Balance, Category, Order, Product, Session, UserProfile};
    use crumb_core::errors::{BackendError, GenerativeError};
    use rust_decimal::Decimal;

    use crate::llm::GenerativeClient;
    use crate::pipeline::{
        AssistantPipeline, APOLOGY_REPLY, FALLBACK_UNAVAILABLE_REPLY, OFF_TOPIC_REPLY,
    };
    use crate::rules::LOGIN_PROMPT_REPLY;

    #[derive(Clone, Default)]
    struct FakeBackend {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl StorefrontBackend for FakeBackend {
        async fn products(&self) -> Result<Vec<Product>, BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![
                product("rye-1", "Rye Loaf", 450),
                product("cro-1", "Butter Croissant", 320),
                product("bag-1", "Sesame Bagel", 280),
            ])
        }

        async fn categories(&self) -> Result<Vec<Category>, BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![Category { id: "c1".to_string(), name: "Breads".to_string() }])
        }

        async fn profile(&self, _session: &Session) -> Result<UserProfile, BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(UserProfile { id: "u1".to_string(), name: "Maya".to_string(), email: None })
        }

        async fn orders(&self, _session: &Session) -> Result<Vec<Order>, BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }

        async fn balance(&self, _session: &Session) -> Result<Balance, BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Balance { amount: Decimal::new(2000, 2), currency: "USD".to_string() })
        }
    }

    fn product(id: &str, name: &str, cents: i64) -> Product {
        Product { id: id.to_string(), name: name.to_string(), price: Decimal::new(cents, 2) }
    }

    /// Scripted generative client that records how often it was invoked.
    struct FakeGenerative {
        outcome: Result<String, GenerativeError>,
        calls: Arc<AtomicUsize>,
    }

    impl FakeGenerative {
        fn returning(outcome: Result<String, GenerativeError>) -> Self {
            Self { outcome, calls: Arc::new(AtomicUsize::new(0)) }
        }
    }

    #[async_trait]
    impl GenerativeClient for FakeGenerative {
        async fn generate(
            &self,
            _system_prompt: &str,
            _user_text: &str,
        ) -> Result<String, GenerativeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }
    }

    #[tokio::test]
    async fn product_question_is_answered_locally_without_the_generative_stage() {
        let backend = FakeBackend::default();
        let generative = FakeGenerative::returning(Ok("should not be used".to_string()));
        let generative_calls = generative.calls.clone();
        let pipeline = AssistantPipeline::new(backend, generative);

        let result = pipeline.send_message("what products do you sell", &Session::anonymous()).await;

        assert!(result.success);
        assert!(result.message.contains("Rye Loaf"));
        assert!(result.message.contains("Butter Croissant"));
        assert!(result.message.contains("Sesame Bagel"));
        assert!(result.message.contains("$4.50"));
        assert_eq!(generative_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn off_topic_message_short_circuits_with_zero_network_calls() {
        let backend = FakeBackend::default();
        let backend_calls = backend.calls.clone();
        let generative = FakeGenerative::returning(Ok("unused".to_string()));
        let generative_calls = generative.calls.clone();
        let pipeline = AssistantPipeline::new(backend, generative);

        let result = pipeline.send_message("tell me a joke about cats", &Session::anonymous()).await;

        assert!(result.success);
        assert_eq!(result.message, OFF_TOPIC_REPLY);
        assert_eq!(backend_calls.load(Ordering::SeqCst), 0);
        assert_eq!(generative_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unmatched_domain_question_goes_generative_and_returns_the_completion() {
        let backend = FakeBackend::default();
        let generative =
            FakeGenerative::returning(Ok("The croissant pairs well with coffee.".to_string()));
        let pipeline = AssistantPipeline::new(backend, generative);

        let result = pipeline.send_message("recommend me something", &Session::anonymous()).await;

        assert!(result.success);
        assert_eq!(result.message, "The croissant pairs well with coffee.");
    }

    #[tokio::test]
    async fn generative_timeout_maps_to_the_fixed_apology_without_escaping() {
        let backend = FakeBackend::default();
        let generative =
            FakeGenerative::returning(Err(GenerativeError::Timeout { timeout_secs: 20 }));
        let pipeline = AssistantPipeline::new(backend, generative);

        let result = pipeline.send_message("recommend me something", &Session::anonymous()).await;

        assert!(!result.success);
        assert_eq!(result.message, APOLOGY_REPLY);
    }

    #[tokio::test]
    async fn generative_shape_error_maps_to_the_same_apology() {
        let backend = FakeBackend::default();
        let generative = FakeGenerative::returning(Err(GenerativeError::EmptyCompletion));
        let pipeline = AssistantPipeline::new(backend, generative);

        let result = pipeline.send_message("recommend me something", &Session::anonymous()).await;

        assert!(!result.success);
        assert_eq!(result.message, APOLOGY_REPLY);
    }

    #[tokio::test]
    async fn unconfigured_generative_fallback_is_a_successful_fixed_reply() {
        let backend = FakeBackend::default();
        let generative = FakeGenerative::returning(Err(GenerativeError::NotConfigured));
        let pipeline = AssistantPipeline::new(backend, generative);

        let result = pipeline.send_message("recommend me something", &Session::anonymous()).await;

        assert!(result.success);
        assert_eq!(result.message, FALLBACK_UNAVAILABLE_REPLY);
    }

    #[tokio::test]
    async fn anonymous_personal_question_gets_the_login_prompt() {
        let backend = FakeBackend::default();
        let generative = FakeGenerative::returning(Ok("unused".to_string()));
        let generative_calls = generative.calls.clone();
        let pipeline = AssistantPipeline::new(backend, generative);

        let result = pipeline.send_message("show my orders", &Session::anonymous()).await;

        assert!(result.success);
        assert_eq!(result.message, LOGIN_PROMPT_REPLY);
        assert_eq!(generative_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn authenticated_empty_order_history_is_an_explicit_sentence() {
        let backend = FakeBackend::default();
        let generative = FakeGenerative::returning(Ok("unused".to_string()));
        let pipeline = AssistantPipeline::new(backend, generative);

        let result = pipeline.send_message("show my orders", &Session::authenticated("tok")).await;

        assert!(result.success);
        assert!(result.message.contains("don't have any orders yet"));
    }
}
