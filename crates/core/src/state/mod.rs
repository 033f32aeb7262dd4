pub mod feature;
pub mod research;
pub mod session;
pub mod transcript;

pub use feature::{Decision, FeatureDefinition, FeatureEvaluation};
pub use research::{
    ClarifiedQuery, ClarifyingQuestion, ClarifyingQuestions, Report, SearchItem, SearchPlan,
};
pub use session::{Phase, Session};
pub use transcript::{Message, Role, Transcript};
