use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// One selectable answer. Order inside a question is presentation order only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOption {
    pub label: String,
    pub points: u32,
}

impl QuizOption {
    pub fn new(label: impl Into<String>, points: u32) -> Self {
        Self {
            label: label.into(),
            points,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    /// Short title shown above the prompt.
    #[serde(default)]
    pub headline: String,
    pub prompt: String,
    pub options: Vec<QuizOption>,
}

impl Question {
    pub fn option(&self, index: usize) -> Option<&QuizOption> {
        self.options.get(index)
    }

    /// Whether `option` is one of this question's options (label and points).
    pub fn offers(&self, option: &QuizOption) -> bool {
        self.options.iter().any(|o| o == option)
    }

    pub fn max_points(&self) -> u32 {
        self.options.iter().map(|o| o.points).max().unwrap_or(0)
    }
}

/// A recorded selection. Immutable once pushed onto a session's answer list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub question_id: String,
    pub label: String,
    pub points: u32,
}

impl Answer {
    pub fn new(question: &Question, option: &QuizOption) -> Self {
        Self {
            question_id: question.id.clone(),
            label: option.label.clone(),
            points: option.points,
        }
    }
}

/// Ordered, validated list of questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Validate and wrap a list of questions.
    ///
    /// # Errors
    ///
    /// Fails on an empty list, a question without options, or a repeated id.
    pub fn new(questions: Vec<Question>) -> Result<Self, ConfigError> {
        if questions.is_empty() {
            return Err(ConfigError::EmptyQuestionBank);
        }
        let mut seen = HashSet::new();
        for q in &questions {
            if !seen.insert(q.id.as_str()) {
                return Err(ConfigError::DuplicateQuestionId(q.id.clone()));
            }
            if q.options.is_empty() {
                return Err(ConfigError::EmptyOptions {
                    question_id: q.id.clone(),
                });
            }
        }
        Ok(Self { questions })
    }

    /// The seven-question portal bank.
    pub fn default_portal() -> Self {
        let q = |id: &str, headline: &str, prompt: &str, options: [(&str, u32); 4]| Question {
            id: id.into(),
            headline: headline.into(),
            prompt: prompt.into(),
            options: options
                .iter()
                .map(|(label, points)| QuizOption::new(*label, *points))
                .collect(),
        };
        Self {
            questions: vec![
                q(
                    "fog",
                    "The Veil",
                    "How often does your mind feel clouded, as if covered by a fog?",
                    [
                        ("Never", 0),
                        ("Sometimes", 1),
                        ("Frequently", 2),
                        ("Almost every day", 3),
                    ],
                ),
                q(
                    "wake",
                    "The Morning Sign",
                    "How do you usually wake up?",
                    [
                        ("Energized and clear", 0),
                        ("Tired, even after sleep", 1),
                        ("Anxious or empty", 2),
                        ("Lost, without direction", 3),
                    ],
                ),
                q(
                    "spirituality",
                    "The Opening",
                    "What is your relationship with spirituality today?",
                    [
                        ("I don't believe in it", 0),
                        ("Curious, but distant", 1),
                        ("I study or practice sometimes", 2),
                        ("It guides my life", 3),
                    ],
                ),
                q(
                    "knowledge",
                    "Hidden Knowledge",
                    "Have you heard of chakras, energy, or the pineal gland?",
                    [
                        ("Never, and I dismiss it", 0),
                        ("I've heard of it", 1),
                        ("I've studied a little", 2),
                        ("I practice it in my life", 3),
                    ],
                ),
                q(
                    "fear",
                    "Shadow",
                    "What weighs heaviest inside you?",
                    [
                        ("Losing clarity", 1),
                        ("Endless anxiety", 2),
                        ("Never realizing my dreams", 2),
                        ("A life without purpose", 3),
                    ],
                ),
                q(
                    "gift",
                    "Choice",
                    "If you could unlock one gift right now, which would you choose?",
                    [
                        ("Mental clarity", 1),
                        ("Emotional balance", 2),
                        ("Lucid dreams", 2),
                        ("Manifestation of abundance", 3),
                    ],
                ),
                q(
                    "commitment",
                    "Will",
                    "If there was a natural way, woven through science and ancient wisdom, \
                     to accelerate your clarity, you would...",
                    [
                        ("Laugh and ignore", 0),
                        ("Be curious but not try", 1),
                        ("Try carefully", 2),
                        ("Begin immediately", 3),
                    ],
                ),
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Question> {
        self.questions.iter()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Highest reachable total score.
    pub fn max_score(&self) -> u32 {
        self.questions
            .iter()
            .fold(0u32, |acc, q| acc.saturating_add(q.max_points()))
    }
}

impl Default for QuestionBank {
    fn default() -> Self {
        Self::default_portal()
    }
}
