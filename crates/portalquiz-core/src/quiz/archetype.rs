use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::quiz::scoring;

/// Closed set of outcome categories. Serialized as the archetype id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchetypeKind {
    Asleep,
    Seeker,
    Alchemist,
    Visionary,
}

impl ArchetypeKind {
    pub fn id(&self) -> &'static str {
        match self {
            ArchetypeKind::Asleep => "asleep",
            ArchetypeKind::Seeker => "seeker",
            ArchetypeKind::Alchemist => "alchemist",
            ArchetypeKind::Visionary => "visionary",
        }
    }
}

impl fmt::Display for ArchetypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Follow-up link offered on an unlocked result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallToAction {
    pub label: String,
    pub url: String,
}

impl CallToAction {
    /// "Receive the Gift", pointing at the free follow-up download.
    pub fn gift() -> Self {
        Self {
            label: "Receive the Gift".into(),
            url: "https://cerebralshift.gumroad.com/l/uymfree".into(),
        }
    }
}

/// A score range mapped to an archetype.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchetypeBucket {
    pub min_score: u32,
    /// Inclusive upper bound. `None` only on the top bucket.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_score: Option<u32>,
    pub archetype: ArchetypeKind,
    pub title: String,
    #[serde(default)]
    pub prose: String,
    #[serde(default)]
    pub reflection: String,
    /// Whether the result view exposes the follow-up call-to-action.
    pub unlocked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_to_action: Option<CallToAction>,
}

impl ArchetypeBucket {
    pub fn contains(&self, score: u32) -> bool {
        score >= self.min_score && self.max_score.map_or(true, |max| score <= max)
    }

    /// The call-to-action to show, if any. Locked buckets never offer one.
    pub fn offered_call_to_action(&self) -> Option<&CallToAction> {
        self.call_to_action.as_ref().filter(|_| self.unlocked)
    }
}

/// Contiguous, disjoint buckets covering `[0, +inf)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ArchetypeTable {
    buckets: Vec<ArchetypeBucket>,
}

impl ArchetypeTable {
    /// Validate and wrap a bucket list.
    ///
    /// # Errors
    ///
    /// Fails unless the buckets start at 0, follow each other without gaps or
    /// overlaps, and only the last one is unbounded.
    pub fn new(buckets: Vec<ArchetypeBucket>) -> Result<Self, ConfigError> {
        if buckets.is_empty() {
            return Err(ConfigError::EmptyArchetypeTable);
        }
        let mut expected = 0u32;
        for (i, bucket) in buckets.iter().enumerate() {
            let is_last = i + 1 == buckets.len();
            if bucket.min_score > expected {
                return Err(ConfigError::ArchetypeGap {
                    expected,
                    found: bucket.min_score,
                });
            }
            if bucket.min_score < expected {
                return Err(ConfigError::ArchetypeOverlap {
                    previous_max: expected - 1,
                    found: bucket.min_score,
                });
            }
            match (bucket.max_score, is_last) {
                (Some(max), _) if max < bucket.min_score => {
                    return Err(ConfigError::InvertedBucket {
                        min: bucket.min_score,
                        max,
                    });
                }
                (Some(max), true) => return Err(ConfigError::BoundedTopBucket { max }),
                (Some(max), false) => {
                    expected = max.checked_add(1).ok_or(ConfigError::BoundedTopBucket { max })?;
                }
                (None, false) => {
                    return Err(ConfigError::UnboundedBucketNotLast {
                        min: bucket.min_score,
                    });
                }
                (None, true) => {}
            }
        }
        Ok(Self { buckets })
    }

    /// Asleep `[0,5]`, Seeker `[6,12]`, Alchemist `[13,18]`, Visionary `[19,+inf)`.
    pub fn default_portal() -> Self {
        Self {
            buckets: vec![
                ArchetypeBucket {
                    min_score: 0,
                    max_score: Some(5),
                    archetype: ArchetypeKind::Asleep,
                    title: "The Asleep Mind".into(),
                    prose: "The veil remains thick. The portal does not open yet.".into(),
                    reflection: "Your path shows patterns of resistance and avoidance, like \
                        shadows fleeing from light. This is not judgment, but recognition. The \
                        mind builds walls when it fears what lies beyond them. Yet even in sleep, \
                        the soul whispers. When the calling grows stronger, return. The portal \
                        waits with infinite patience."
                        .into(),
                    unlocked: false,
                    call_to_action: None,
                },
                ArchetypeBucket {
                    min_score: 6,
                    max_score: Some(12),
                    archetype: ArchetypeKind::Seeker,
                    title: "The Seeker".into(),
                    prose: "You unlocked the first gate. A gift reveals itself: a key to your \
                        next step."
                        .into(),
                    reflection: "You stand at the threshold between worlds, curiosity lighting \
                        your way like stars through fog. Your choices reveal a mind beginning to \
                        question and to seek beyond the surface. The fragments of clarity you've \
                        gathered are not random; they form a map. Trust this inner compass."
                        .into(),
                    unlocked: true,
                    call_to_action: Some(CallToAction::gift()),
                },
                ArchetypeBucket {
                    min_score: 13,
                    max_score: Some(18),
                    archetype: ArchetypeKind::Alchemist,
                    title: "The Alchemist".into(),
                    prose: "You crossed deeper layers of shadow. Receive your key. Beyond it, \
                        the path deepens."
                        .into(),
                    reflection: "Your journey reveals the heart of a true alchemist, one who \
                        transmutes shadow into light and confusion into clarity. Your answers \
                        show not just seeking, but genuine commitment to inner alchemy. You are \
                        becoming a bridge between worlds."
                        .into(),
                    unlocked: true,
                    call_to_action: Some(CallToAction::gift()),
                },
                ArchetypeBucket {
                    min_score: 19,
                    max_score: None,
                    archetype: ArchetypeKind::Visionary,
                    title: "The Visionary".into(),
                    prose: "You walked through the portal. The key reveals itself, yet it is \
                        only the beginning."
                        .into(),
                    reflection: "You see beyond the veil with clarity and purpose. Your path \
                        shows deep integration of wisdom, authentic practice, and unwavering \
                        commitment to growth. The deepest teachings await those who can hold \
                        this level of light."
                        .into(),
                    unlocked: true,
                    call_to_action: Some(CallToAction::gift()),
                },
            ],
        }
    }

    /// The bucket containing `score`.
    pub fn classify(&self, score: u32) -> &ArchetypeBucket {
        match scoring::classify(score, &self.buckets) {
            Ok(bucket) => bucket,
            // `new` guarantees buckets start at 0, are contiguous and end unbounded.
            Err(err) => unreachable!("validated archetype table failed to classify: {err}"),
        }
    }

    pub fn buckets(&self) -> &[ArchetypeBucket] {
        &self.buckets
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

impl Default for ArchetypeTable {
    fn default() -> Self {
        Self::default_portal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bucket(min: u32, max: Option<u32>, archetype: ArchetypeKind) -> ArchetypeBucket {
        ArchetypeBucket {
            min_score: min,
            max_score: max,
            archetype,
            title: archetype.id().into(),
            prose: String::new(),
            reflection: String::new(),
            unlocked: archetype != ArchetypeKind::Asleep,
            call_to_action: None,
        }
    }

    #[test]
    fn default_table_is_valid() {
        let table = ArchetypeTable::default();
        assert!(ArchetypeTable::new(table.buckets().to_vec()).is_ok());
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn classify_boundaries() {
        let table = ArchetypeTable::default();
        assert_eq!(table.classify(0).archetype, ArchetypeKind::Asleep);
        assert_eq!(table.classify(5).archetype, ArchetypeKind::Asleep);
        assert_eq!(table.classify(6).archetype, ArchetypeKind::Seeker);
        assert_eq!(table.classify(12).archetype, ArchetypeKind::Seeker);
        assert_eq!(table.classify(13).archetype, ArchetypeKind::Alchemist);
        assert_eq!(table.classify(18).archetype, ArchetypeKind::Alchemist);
        assert_eq!(table.classify(19).archetype, ArchetypeKind::Visionary);
        assert_eq!(table.classify(u32::MAX).archetype, ArchetypeKind::Visionary);
    }

    #[test]
    fn rejects_empty_table() {
        assert_eq!(
            ArchetypeTable::new(Vec::new()),
            Err(ConfigError::EmptyArchetypeTable)
        );
    }

    #[test]
    fn rejects_table_not_starting_at_zero() {
        let err = ArchetypeTable::new(vec![bucket(1, None, ArchetypeKind::Seeker)]).unwrap_err();
        assert_eq!(err, ConfigError::ArchetypeGap { expected: 0, found: 1 });
    }

    #[test]
    fn rejects_gap() {
        let err = ArchetypeTable::new(vec![
            bucket(0, Some(5), ArchetypeKind::Asleep),
            bucket(7, None, ArchetypeKind::Seeker),
        ])
        .unwrap_err();
        assert_eq!(err, ConfigError::ArchetypeGap { expected: 6, found: 7 });
    }

    #[test]
    fn rejects_overlap() {
        let err = ArchetypeTable::new(vec![
            bucket(0, Some(5), ArchetypeKind::Asleep),
            bucket(5, None, ArchetypeKind::Seeker),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::ArchetypeOverlap {
                previous_max: 5,
                found: 5
            }
        );
    }

    #[test]
    fn rejects_bounded_top_bucket() {
        let err = ArchetypeTable::new(vec![
            bucket(0, Some(5), ArchetypeKind::Asleep),
            bucket(6, Some(12), ArchetypeKind::Seeker),
        ])
        .unwrap_err();
        assert_eq!(err, ConfigError::BoundedTopBucket { max: 12 });
    }

    #[test]
    fn rejects_unbounded_middle_bucket() {
        let err = ArchetypeTable::new(vec![
            bucket(0, None, ArchetypeKind::Asleep),
            bucket(6, None, ArchetypeKind::Seeker),
        ])
        .unwrap_err();
        assert_eq!(err, ConfigError::UnboundedBucketNotLast { min: 0 });
    }

    #[test]
    fn rejects_inverted_bucket() {
        let err = ArchetypeTable::new(vec![
            bucket(0, Some(3), ArchetypeKind::Asleep),
            bucket(4, Some(2), ArchetypeKind::Seeker),
            bucket(5, None, ArchetypeKind::Visionary),
        ])
        .unwrap_err();
        assert_eq!(err, ConfigError::InvertedBucket { min: 4, max: 2 });
    }

    #[test]
    fn single_unbounded_bucket_is_valid() {
        let table = ArchetypeTable::new(vec![bucket(0, None, ArchetypeKind::Seeker)]).unwrap();
        assert_eq!(table.classify(42).archetype, ArchetypeKind::Seeker);
    }

    #[test]
    fn unlocked_buckets_offer_the_gift() {
        let table = ArchetypeTable::default();
        assert_eq!(table.classify(3).offered_call_to_action(), None);
        for score in [6, 13, 19] {
            let cta = table.classify(score).offered_call_to_action().unwrap();
            assert_eq!(cta.label, "Receive the Gift");
            assert_eq!(cta.url, "https://cerebralshift.gumroad.com/l/uymfree");
        }
    }

    #[test]
    fn locked_bucket_hides_configured_call_to_action() {
        let mut locked = bucket(0, None, ArchetypeKind::Asleep);
        locked.call_to_action = Some(CallToAction::gift());
        assert!(!locked.unlocked);
        assert_eq!(locked.offered_call_to_action(), None);
    }

    #[test]
    fn call_to_action_defaults_to_none_when_omitted() {
        let parsed: ArchetypeBucket = serde_json::from_value(serde_json::json!({
            "min_score": 0,
            "archetype": "seeker",
            "title": "Custom",
            "unlocked": true,
        }))
        .unwrap();
        assert_eq!(parsed.call_to_action, None);
        assert_eq!(parsed.offered_call_to_action(), None);
    }

    #[test]
    fn kind_serializes_as_id() {
        let json = serde_json::to_string(&ArchetypeKind::Alchemist).unwrap();
        assert_eq!(json, "\"alchemist\"");
    }
}
