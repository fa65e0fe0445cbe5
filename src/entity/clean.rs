//! Cleaning policy applied to every record before it is written.
//!
//! Only meaningful values leave the client: absent fields are dropped, and so
//! is any relation whose selector was left on the "no selection" entry, so an
//! unfilled form control never overwrites a value the backend holds.

use serde_json::{Map, Value};

use super::Entity;

/// Serialize `record` and strip placeholder fields from it.
pub fn clean_record<E: Entity>(record: &E) -> serde_json::Result<Value> {
    serde_json::to_value(record).map(clean_value)
}

/// Strip placeholder fields from an already serialized record.
///
/// Non-object values are returned unchanged.
pub fn clean_value(value: Value) -> Value {
    match value {
        Value::Object(fields) => Value::Object(
            fields
                .into_iter()
                .filter(|(_, field)| is_meaningful(field))
                .collect::<Map<String, Value>>(),
        ),
        other => other,
    }
}

fn is_meaningful(field: &Value) -> bool {
    match field {
        Value::Null => false,
        Value::Object(relation) => !relation.get("id").is_some_and(is_no_selection),
        _ => true,
    }
}

/// Selector sentinels: the empty option renders as `""`, some widgets use `-1`.
fn is_no_selection(id: &Value) -> bool {
    match id {
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_i64() == Some(-1),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::entity::{ClassEntity, Student};

    #[test]
    fn drops_absent_fields() {
        let record = ClassEntity {
            id: None,
            class_id: Some(32152),
            name: None,
        };
        assert_eq!(clean_record(&record).unwrap(), json!({ "classId": 32152 }));
    }

    #[test]
    fn fully_populated_record_is_unchanged() {
        let student = Student {
            id: Some(1),
            student_id: Some(2),
            name: Some("Ada".into()),
            age: Some(12),
            class_nam: Some("5B".into()),
            address: Some("Main St".into()),
        };
        let raw = serde_json::to_value(&student).unwrap();
        assert_eq!(clean_record(&student).unwrap(), raw);
    }

    #[test]
    fn drops_unselected_relations() {
        let value = json!({
            "name": "Ada",
            "classEntity": { "id": "" },
            "mentor": { "id": -1 },
            "school": { "id": 4 },
        });
        assert_eq!(
            clean_value(value),
            json!({ "name": "Ada", "school": { "id": 4 } })
        );
    }

    #[test]
    fn keeps_falsy_scalars() {
        let value = json!({ "age": 0, "name": "", "active": false });
        assert_eq!(clean_value(value.clone()), value);
    }
}
