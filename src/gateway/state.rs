use std::sync::Arc;

use crate::feedback::FeedbackLog;
use crate::gatekeeper::Gatekeeper;
use crate::model::{ProbabilisticClassifier, TextVectorizer};
use crate::suggestions::SuggestionTable;

pub struct HandlerState<V, C>
where
    V: TextVectorizer + 'static,
    C: ProbabilisticClassifier + 'static,
{
    pub gatekeeper: Arc<Gatekeeper<V, C>>,

    /// `None` when suggestions are switched off.
    pub suggestions: Option<Arc<SuggestionTable>>,

    /// `None` when feedback logging is switched off.
    pub feedback: Option<Arc<FeedbackLog>>,
}

impl<V, C> Clone for HandlerState<V, C>
where
    V: TextVectorizer + 'static,
    C: ProbabilisticClassifier + 'static,
{
    fn clone(&self) -> Self {
        Self {
            gatekeeper: Arc::clone(&self.gatekeeper),
            suggestions: self.suggestions.clone(),
            feedback: self.feedback.clone(),
        }
    }
}

impl<V, C> HandlerState<V, C>
where
    V: TextVectorizer + 'static,
    C: ProbabilisticClassifier + 'static,
{
    pub fn new(gatekeeper: Arc<Gatekeeper<V, C>>) -> Self {
        Self {
            gatekeeper,
            suggestions: None,
            feedback: None,
        }
    }

    pub fn with_suggestions(mut self, suggestions: SuggestionTable) -> Self {
        self.suggestions = Some(Arc::new(suggestions));
        self
    }

    pub fn with_feedback(mut self, feedback: FeedbackLog) -> Self {
        self.feedback = Some(Arc::new(feedback));
        self
    }

    pub fn suggestion_for(&self, label: &str) -> Option<&str> {
        self.suggestions.as_ref().map(|table| table.lookup(label))
    }

    pub fn feedback_enabled(&self) -> bool {
        self.feedback.is_some()
    }
}
