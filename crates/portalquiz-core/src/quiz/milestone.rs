use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Shown once the last ritual step of an interlude is done.
pub const RITUAL_COMPLETE_TEXT: &str = "Energy aligned. Continue your journey...";

/// One instruction in an interlude ritual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RitualStep {
    Tap,
    Align,
    Feel,
}

impl RitualStep {
    pub fn instruction(&self) -> &'static str {
        match self {
            RitualStep::Tap => "Tap the glowing sigil to activate",
            RitualStep::Align => "Breathe and align your energy",
            RitualStep::Feel => "Feel the portal widening",
        }
    }
}

fn default_rituals() -> Vec<RitualStep> {
    vec![RitualStep::Tap, RitualStep::Align, RitualStep::Feel]
}

fn default_headline() -> String {
    "The portal widens...".into()
}

/// Interlude content. Rituals guide presentation; the flow engine ignores them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneContent {
    #[serde(default = "default_headline")]
    pub headline: String,
    #[serde(default = "default_rituals")]
    pub rituals: Vec<RitualStep>,
}

impl Default for MilestoneContent {
    fn default() -> Self {
        Self {
            headline: default_headline(),
            rituals: default_rituals(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    /// Progress percentage in `(0, 100]` at which the interlude becomes due.
    pub threshold_percent: u32,
    #[serde(default)]
    pub content: MilestoneContent,
}

impl Milestone {
    pub fn at(threshold_percent: u32) -> Self {
        Self {
            threshold_percent,
            content: MilestoneContent::default(),
        }
    }
}

/// Milestones with strictly ascending thresholds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MilestoneTable {
    milestones: Vec<Milestone>,
}

impl MilestoneTable {
    /// Validate and wrap a milestone list. An empty list is allowed.
    ///
    /// # Errors
    ///
    /// Fails when a threshold is outside `(0, 100]` or does not exceed the
    /// one before it.
    pub fn new(milestones: Vec<Milestone>) -> Result<Self, ConfigError> {
        let mut previous: Option<u32> = None;
        for m in &milestones {
            let threshold = m.threshold_percent;
            if threshold == 0 || threshold > 100 {
                return Err(ConfigError::ThresholdOutOfRange { threshold });
            }
            if let Some(previous) = previous {
                if threshold <= previous {
                    return Err(ConfigError::ThresholdNotAscending {
                        previous,
                        threshold,
                    });
                }
            }
            previous = Some(threshold);
        }
        Ok(Self { milestones })
    }

    /// Interludes at 25%, 50% and 75%.
    pub fn default_portal() -> Self {
        Self {
            milestones: vec![Milestone::at(25), Milestone::at(50), Milestone::at(75)],
        }
    }

    /// Lowest unfired milestone whose threshold has been reached.
    pub fn next_due(&self, progress_percent: u32, fired: &BTreeSet<u32>) -> Option<&Milestone> {
        self.milestones
            .iter()
            .take_while(|m| m.threshold_percent <= progress_percent)
            .find(|m| !fired.contains(&m.threshold_percent))
    }

    pub fn get(&self, threshold_percent: u32) -> Option<&Milestone> {
        self.milestones
            .iter()
            .find(|m| m.threshold_percent == threshold_percent)
    }

    pub fn milestones(&self) -> &[Milestone] {
        &self.milestones
    }

    pub fn len(&self) -> usize {
        self.milestones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.milestones.is_empty()
    }
}

impl Default for MilestoneTable {
    fn default() -> Self {
        Self::default_portal()
    }
}
