use bytes::Bytes;
use serde::{ser::SerializeMap, Serialize, Serializer};

use super::duration::{format_duration, RoundingMode};

/// One uploaded file. Lives only for the request that carried it.
#[derive(Debug, Clone)]
pub struct ResumeDocument {
    pub filename: String,
    pub content: Bytes,
}

/// Decimal years plus their rendering. Built only through `new`, so the two always agree.
/// Callers pass finite figures only; serde would write a non-finite one as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperienceEstimate {
    decimal: f64,
    human: String,
}

impl ExperienceEstimate {
    pub fn new(decimal: f64, rounding: RoundingMode) -> Self {
        Self {
            decimal,
            human: format_duration(decimal, rounding),
        }
    }

    pub fn decimal(&self) -> f64 {
        self.decimal
    }

    pub fn human(&self) -> &str {
        &self.human
    }
}

/// Outcome for one file: `{"decimal", "human"}` or `{"error"}`, never both.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResultRecord {
    Success(ExperienceEstimate),
    Failure { error: String },
}

impl ResultRecord {
    pub fn is_failure(&self) -> bool {
        matches!(self, ResultRecord::Failure { .. })
    }
}

/// Results keyed by filename, in upload order.
///
/// Re-inserting a filename replaces its record but keeps its original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultRecords {
    entries: Vec<(String, ResultRecord)>,
}

impl ResultRecords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, filename: String, record: ResultRecord) {
        match self.entries.iter_mut().find(|(name, _)| *name == filename) {
            Some((_, existing)) => *existing = record,
            None => self.entries.push((filename, record)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResultRecord)> {
        self.entries.iter().map(|(name, record)| (name.as_str(), record))
    }
}

impl Serialize for ResultRecords {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (filename, record) in &self.entries {
            map.serialize_entry(filename, record)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn failure(msg: &str) -> ResultRecord {
        ResultRecord::Failure {
            error: msg.to_string(),
        }
    }

    #[test]
    fn test_success_serializes_decimal_and_human_only() {
        let record = ResultRecord::Success(ExperienceEstimate::new(1.5, RoundingMode::Round));
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({"decimal": 1.5, "human": "1 years 6 months"})
        );
    }

    #[test]
    fn test_failure_serializes_error_only() {
        assert_eq!(
            serde_json::to_value(failure("boom")).unwrap(),
            json!({"error": "boom"})
        );
    }

    #[test]
    fn test_records_keep_upload_order() {
        let mut records = ResultRecords::new();
        records.insert("z.txt".into(), failure("a"));
        records.insert("a.txt".into(), failure("b"));
        records.insert("m.txt".into(), failure("c"));

        let names: Vec<&str> = records.iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["z.txt", "a.txt", "m.txt"]);

        let rendered = serde_json::to_string(&records).unwrap();
        let z = rendered.find("z.txt").unwrap();
        let a = rendered.find("a.txt").unwrap();
        let m = rendered.find("m.txt").unwrap();
        assert!(z < a && a < m);
    }

    #[test]
    fn test_duplicate_filename_replaces_in_place() {
        let mut records = ResultRecords::new();
        records.insert("cv.txt".into(), failure("first"));
        records.insert("other.txt".into(), failure("x"));
        records.insert(
            "cv.txt".into(),
            ResultRecord::Success(ExperienceEstimate::new(2.0, RoundingMode::Round)),
        );

        assert_eq!(records.len(), 2);
        assert_eq!(records.iter().next().unwrap().0, "cv.txt");
        match records.iter().find(|(n, _)| *n == "cv.txt").unwrap().1 {
            ResultRecord::Success(estimate) => {
                assert_eq!(estimate.decimal(), 2.0);
                assert_eq!(estimate.human(), "2 years");
            }
            other => panic!("expected success, got {other:?}"),
        };
    }
}
