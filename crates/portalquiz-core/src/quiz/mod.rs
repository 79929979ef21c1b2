mod archetype;
mod bank;
mod engine;
mod milestone;
mod result;
pub mod scoring;

pub use archetype::{ArchetypeBucket, ArchetypeKind, ArchetypeTable, CallToAction};
pub use bank::{Answer, Question, QuestionBank, QuizOption};
pub use engine::{FlowState, Phase, QuizEngine, QuizView};
pub use milestone::{Milestone, MilestoneContent, MilestoneTable, RitualStep, RITUAL_COMPLETE_TEXT};
pub use result::QuizResult;

/// The three static tables a session reads. Each is validated on construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizTables {
    pub bank: QuestionBank,
    pub archetypes: ArchetypeTable,
    pub milestones: MilestoneTable,
}

impl QuizTables {
    pub fn new(bank: QuestionBank, archetypes: ArchetypeTable, milestones: MilestoneTable) -> Self {
        Self {
            bank,
            archetypes,
            milestones,
        }
    }
}
