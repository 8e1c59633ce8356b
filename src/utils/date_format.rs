use serde::{self, Deserialize, Deserializer, Serializer};
use time::{Date, macros::format_description};

/// Parses the dates returned by Chorus Pro.
///
/// Dates are usually plain ISO dates (`2024-03-05`); a datetime string is
/// truncated to its date part.
pub fn parse_chorus_date(date_str: &str) -> Result<Date, String> {
    let format = format_description!("[year]-[month]-[day]");

    // If the string contains a 'T', it might be a datetime string - extract just the date part
    let date_part = date_str.split('T').next().unwrap_or(date_str);

    Date::parse(date_part, &format).map_err(|e| format!("Failed to parse date '{date_str}': {e}"))
}

// Serialization module for time::Date
pub mod iso_date_format {
    use super::{
        Date, Deserialize, Deserializer, Serializer, format_description, parse_chorus_date, serde,
    };

    pub fn serialize<S>(date: &Date, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = date
            .format(&format_description!("[year]-[month]-[day]"))
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Date, D::Error>
    where
        D: Deserializer<'de>,
    {
        let date_str = String::deserialize(deserializer)?;
        parse_chorus_date(&date_str).map_err(serde::de::Error::custom)
    }
}
