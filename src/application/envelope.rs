use crate::domain::validation::Problem;
use crate::error::PosError;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Uniform reply of every operation: `{message, <resource key>, status}`.
///
/// The payload is serialized under the resource's own key (`branch`,
/// `expenses`, ...). `code` is the HTTP-style status handed to the transport
/// and is not part of the JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope<T> {
    pub message: String,
    pub key: &'static str,
    pub data: Option<T>,
    pub status: bool,
    pub code: u16,
    pub problems: Vec<Problem>,
}

impl<T> Envelope<T> {
    pub fn success(key: &'static str, message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            key,
            data: Some(data),
            status: true,
            code: 200,
            problems: Vec::new(),
        }
    }

    /// Read that found nothing: not an error, but nothing to return either.
    pub fn empty(key: &'static str, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            key,
            data: None,
            status: false,
            code: 200,
            problems: Vec::new(),
        }
    }

    pub fn rejected(key: &'static str, error: &PosError) -> Self {
        Self {
            message: error.to_string(),
            key,
            data: None,
            status: false,
            code: error.status_code(),
            problems: error.problems().to_vec(),
        }
    }
}

impl<T: Serialize> Serialize for Envelope<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let len = if self.problems.is_empty() { 3 } else { 4 };
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("message", &self.message)?;
        map.serialize_entry(self.key, &self.data)?;
        map.serialize_entry("status", &self.status)?;
        if !self.problems.is_empty() {
            map.serialize_entry("problems", &self.problems)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validation::ProblemKind;
    use serde_json::json;

    #[test]
    fn test_success_envelope_uses_resource_key() {
        let envelope = Envelope::success("expenses", "Expenses found", vec![1, 2]);
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({"message": "Expenses found", "expenses": [1, 2], "status": true})
        );
        assert_eq!(envelope.code, 200);
    }

    #[test]
    fn test_empty_read_is_not_an_error() {
        let envelope: Envelope<Vec<u8>> = Envelope::empty("expenses", "No expenses found");
        assert!(!envelope.status);
        assert_eq!(envelope.code, 200);
        assert_eq!(
            serde_json::to_value(&envelope).unwrap()["expenses"],
            json!(null)
        );
    }

    #[test]
    fn test_rejection_carries_problems() {
        let error = PosError::Validation(vec![Problem::new(
            ProblemKind::InvalidEnum,
            "status",
            "status must be Active or InActive only",
        )]);
        let envelope: Envelope<()> = Envelope::rejected("branch", &error);

        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(envelope.code, 400);
        assert_eq!(value["status"], json!(false));
        assert_eq!(value["branch"], json!(null));
        assert_eq!(value["problems"][0]["kind"], json!("InvalidEnum"));
        assert_eq!(value["problems"][0]["field"], json!("status"));
    }
}
