use serde::{Deserialize, Serialize};
use validator::Validate;

/// A complete job posting as submitted by a form, without its id.
///
/// Used for both creation and full replacement; there is no partial update.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Validate)]
pub struct JobInput {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,

    #[validate(length(min = 1, message = "Company is required"))]
    pub company: String,

    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "Type is required"))]
    pub job_type: String,

    #[validate(length(min = 1, message = "Experience level is required"))]
    pub experience_level: String,

    #[validate(range(min = 0, message = "Salary must not be negative"))]
    pub salary: i64,
}

/// Query string of the salary listing. `order` stays free text here and
/// is narrowed to a `SortOrder` before it reaches the store.
#[derive(Deserialize, Debug, Default)]
pub struct SortQuery {
    pub order: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_fields_fail_validation() {
        let input = JobInput {
            title: String::new(),
            company: "Acme".into(),
            job_type: "Full-time".into(),
            experience_level: "Junior".into(),
            salary: -1,
        };
        let errors = input.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("salary"));
        assert!(!fields.contains_key("company"));
    }
}
