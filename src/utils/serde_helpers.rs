use serde::{Deserialize, Deserializer};

/// Deserializes an identifier that the API may send either as a string or as
/// a number.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Integer(i64),
        Float(f64),
    }

    match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => Ok(s),
        StringOrNumber::Integer(n) => Ok(n.to_string()),
        StringOrNumber::Float(n) => Ok(n.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Deserialize)]
    struct Wrapper {
        #[serde(deserialize_with = "string_or_number")]
        id: String,
    }

    #[test]
    fn accepts_strings_and_numbers() {
        let from_string: Wrapper = serde_json::from_value(json!({ "id": "CPP42" })).unwrap();
        assert_eq!(from_string.id, "CPP42");

        let from_number: Wrapper = serde_json::from_value(json!({ "id": 42 })).unwrap();
        assert_eq!(from_number.id, "42");
    }
}
