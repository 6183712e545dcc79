//! Emotion score aggregation.
//!
//! Reduces the nested prediction payload of a completed job into a flat
//! [`EmotionTable`] and picks the [`Dominant`] emotion. Pure and stateless:
//! safe to call concurrently with independent payloads.

use serde_json::Value;
use thiserror::Error;

use crate::api::types::SourceFile;

/// Raw scores arrive in `[0, 1]`; the table accumulates them scaled to
/// percentage points.
const SCORE_SCALE: f64 = 100.0;

#[derive(Debug, Error, PartialEq)]
pub enum AggregateError {
    /// No input text was supplied. Raised before any job is ever submitted,
    /// never for a legitimately empty analysis result.
    #[error("no input text was supplied")]
    EmptyInput,

    /// The payload does not match the expected nesting contract. The table
    /// is never partially filled from a deviating payload.
    #[error("prediction payload does not match the expected shape: {0}")]
    MalformedPayload(String),
}

/// Insertion-ordered mapping from emotion name to accumulated score.
///
/// Scores are plain sums of `raw * 100` over every occurrence of the name
/// anywhere in the payload; nothing is normalized, so a recurring emotion
/// can total well past 100. Iteration order is first-seen order of the
/// depth-first payload walk, which is what the dominant-emotion tie-break
/// is defined over.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmotionTable {
    entries: Vec<(String, f64)>,
}

impl EmotionTable {
    fn add(&mut self, name: &str, raw_score: f64) {
        let scaled = raw_score * SCORE_SCALE;
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some((_, total)) => *total += scaled,
            None => self.entries.push((name.to_string(), scaled)),
        }
    }

    pub fn score(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| *s)
    }

    /// Entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(n, s)| (n.as_str(), *s))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry, in first-seen order, whose score equals the maximum.
    fn dominant(&self) -> Option<Dominant> {
        let max = self
            .entries
            .iter()
            .map(|(_, s)| *s)
            .fold(f64::NEG_INFINITY, f64::max);
        self.entries
            .iter()
            .find(|(_, s)| *s == max)
            .map(|(name, score)| Dominant {
                name: name.clone(),
                score: *score,
            })
    }
}

/// The winning emotion of a reduction: highest accumulated score, ties
/// broken by first appearance in the payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Dominant {
    pub name: String,
    pub score: f64,
}

/// Result of reducing one prediction payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Reduction {
    pub table: EmotionTable,
    /// `None` when the payload carried no emotions at all (a success,
    /// distinct from [`AggregateError::EmptyInput`]).
    pub dominant: Option<Dominant>,
}

/// Reduce a completed job's raw payload into a score table and a dominant
/// emotion.
///
/// `input_text` is the original text the caller submitted; a blank value is
/// an input-validation failure regardless of the payload. The payload must
/// match the service's nesting contract exactly
/// (files → predictions → grouped_predictions → predictions → emotions);
/// deviations yield [`AggregateError::MalformedPayload`] rather than a
/// partial table.
pub fn reduce(input_text: &str, payload: &Value) -> Result<Reduction, AggregateError> {
    if input_text.trim().is_empty() {
        return Err(AggregateError::EmptyInput);
    }

    let files: Vec<SourceFile> = serde_json::from_value(payload.clone())
        .map_err(|e| AggregateError::MalformedPayload(e.to_string()))?;

    let mut table = EmotionTable::default();
    for file in &files {
        for prediction in &file.predictions {
            for group in &prediction.grouped_predictions {
                for unit in &group.predictions {
                    for emotion in &unit.emotions {
                        table.add(&emotion.name, emotion.score);
                    }
                }
            }
        }
    }

    let dominant = table.dominant();
    Ok(Reduction { table, dominant })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    /// Payload with a single file/prediction/group, one unit per emotion list.
    fn payload_of(units: Vec<Vec<(&str, f64)>>) -> Value {
        let units: Vec<Value> = units
            .into_iter()
            .map(|emotions| {
                let emotions: Vec<Value> = emotions
                    .into_iter()
                    .map(|(name, score)| json!({"name": name, "score": score}))
                    .collect();
                json!({"emotions": emotions})
            })
            .collect();
        json!([{
            "predictions": [{
                "grouped_predictions": [{
                    "predictions": units
                }]
            }]
        }])
    }

    #[test]
    fn blank_input_is_rejected() {
        let err = reduce("   \n", &json!([])).unwrap_err();
        assert_eq!(err, AggregateError::EmptyInput);
    }

    #[test]
    fn scores_are_summed_and_scaled() {
        let payload = payload_of(vec![
            vec![("joy", 0.2)],
            vec![("joy", 0.3)],
            vec![("fear", 0.4)],
        ]);
        let reduction = reduce("how I feel", &payload).unwrap();

        assert_eq!(reduction.table.len(), 2);
        assert!(close(reduction.table.score("joy").unwrap(), 50.0));
        assert!(close(reduction.table.score("fear").unwrap(), 40.0));

        let dominant = reduction.dominant.unwrap();
        assert_eq!(dominant.name, "joy");
        assert!(close(dominant.score, 50.0));
    }

    #[test]
    fn tie_break_is_first_seen_order() {
        let payload = payload_of(vec![vec![("joy", 0.5), ("sadness", 0.5)]]);
        let reduction = reduce("text", &payload).unwrap();
        assert_eq!(reduction.dominant.unwrap().name, "joy");

        let reordered = payload_of(vec![vec![("sadness", 0.5), ("joy", 0.5)]]);
        let reduction = reduce("text", &reordered).unwrap();
        assert_eq!(reduction.dominant.unwrap().name, "sadness");
    }

    #[test]
    fn table_iteration_preserves_first_seen_order() {
        let payload = payload_of(vec![
            vec![("calmness", 0.1), ("joy", 0.2)],
            vec![("anger", 0.3), ("joy", 0.1)],
        ]);
        let reduction = reduce("text", &payload).unwrap();
        let names: Vec<&str> = reduction.table.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["calmness", "joy", "anger"]);
    }

    #[test]
    fn recurring_emotion_can_exceed_one_hundred() {
        let payload = payload_of(vec![vec![("joy", 0.75)], vec![("joy", 0.75)]]);
        let reduction = reduce("text", &payload).unwrap();
        assert!(close(reduction.table.score("joy").unwrap(), 150.0));
    }

    #[test]
    fn empty_payload_with_real_input_is_a_success() {
        let reduction = reduce("still a real question", &json!([])).unwrap();
        assert!(reduction.table.is_empty());
        assert_eq!(reduction.dominant, None);
    }

    #[test]
    fn empty_nesting_is_a_success_with_no_dominant() {
        let payload = json!([{
            "predictions": [{"grouped_predictions": []}]
        }]);
        let reduction = reduce("text", &payload).unwrap();
        assert!(reduction.table.is_empty());
        assert_eq!(reduction.dominant, None);
    }

    #[test]
    fn missing_nesting_level_is_malformed() {
        // "grouped_predictions" absent one level down.
        let payload = json!([{
            "predictions": [{"predictions": []}]
        }]);
        let err = reduce("text", &payload).unwrap_err();
        assert!(matches!(err, AggregateError::MalformedPayload(_)));
    }

    #[test]
    fn non_array_payload_is_malformed() {
        let err = reduce("text", &json!({"files": []})).unwrap_err();
        assert!(matches!(err, AggregateError::MalformedPayload(_)));
    }

    #[test]
    fn walk_spans_files_and_groups() {
        let payload = json!([
            {
                "predictions": [{
                    "grouped_predictions": [
                        {"predictions": [{"emotions": [{"name": "joy", "score": 0.5}]}]},
                        {"predictions": [{"emotions": [{"name": "fear", "score": 0.9}]}]}
                    ]
                }]
            },
            {
                "predictions": [{
                    "grouped_predictions": [
                        {"predictions": [{"emotions": [{"name": "joy", "score": 0.5}]}]}
                    ]
                }]
            }
        ]);
        let reduction = reduce("text", &payload).unwrap();
        assert!(close(reduction.table.score("joy").unwrap(), 100.0));
        assert!(close(reduction.table.score("fear").unwrap(), 90.0));
        // joy was seen first and matches the maximum exactly.
        assert_eq!(reduction.dominant.unwrap().name, "joy");
    }
}
