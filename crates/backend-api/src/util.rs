use std::fmt::Display;
use std::str::FromStr;

use axum::http::{header::AUTHORIZATION, HeaderMap};
use chrono::NaiveDate;
use serde::{de, Deserialize, Deserializer};

use crate::ApiError;

pub fn require_bearer(headers: &HeaderMap) -> Result<String, ApiError> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| ApiError::unauthorized("Token is missing"))?;

    let mut parts = value.split_whitespace();
    let scheme = parts.next().unwrap_or("");
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return Err(ApiError::unauthorized("Invalid authorization scheme"));
    }

    let token = parts.next().unwrap_or("");
    if token.is_empty() {
        return Err(ApiError::unauthorized("Token is missing"));
    }

    Ok(token.to_string())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ValueOrText<T> {
    Value(T),
    Text(String),
}

/// Accepts a JSON value, a numeric string, an empty string or `null`.
/// Forms post blank inputs as `""`; those are treated as absent.
pub fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: Display,
{
    match Option::<ValueOrText<T>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(ValueOrText::Value(value)) => Ok(Some(value)),
        Some(ValueOrText::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                Ok(None)
            } else {
                text.parse().map(Some).map_err(de::Error::custom)
            }
        }
    }
}

/// Like [`empty_as_none`] but keeps "sent as blank" apart from "not sent",
/// for fields where clearing is meaningful. Pair with `#[serde(default)]`.
pub fn clearable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: Display,
{
    empty_as_none(deserializer).map(Some)
}

/// Dates arrive as `YYYY-MM-DD`, sometimes with a time part appended.
pub fn optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(text) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    let day = text.get(..10).unwrap_or(text);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| de::Error::custom(format!("invalid date `{text}`, expected YYYY-MM-DD")))
}

/// Blank strings become `None`.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn require_bearer_extracts_token_case_insensitive() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("bearer TOKEN123"));

        let token = require_bearer(&headers).expect("token should be extracted");
        assert_eq!(token, "TOKEN123");
    }

    #[test]
    fn require_bearer_rejects_missing_token() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer"));

        let error = require_bearer(&headers).expect_err("should reject missing token");
        assert_eq!(error.status, axum::http::StatusCode::UNAUTHORIZED);
        assert_eq!(error.message, "Token is missing");
    }

    #[derive(Debug, Deserialize)]
    struct RoomForm {
        #[serde(default, deserialize_with = "empty_as_none")]
        floor_number: Option<i64>,
        #[serde(default, deserialize_with = "empty_as_none")]
        area_sqft: Option<f64>,
        #[serde(default, deserialize_with = "clearable")]
        room_id: Option<Option<i64>>,
        #[serde(default, deserialize_with = "optional_date")]
        lease_start_date: Option<NaiveDate>,
    }

    #[test]
    fn blank_form_fields_are_absent() {
        let form: RoomForm = serde_json::from_str(
            r#"{"floor_number": "", "area_sqft": "450.5", "lease_start_date": ""}"#,
        )
        .expect("form parses");
        assert_eq!(form.floor_number, None);
        assert_eq!(form.area_sqft, Some(450.5));
        assert_eq!(form.room_id, None);
        assert_eq!(form.lease_start_date, None);
    }

    #[test]
    fn clearable_distinguishes_null_from_missing() {
        let form: RoomForm =
            serde_json::from_str(r#"{"room_id": null, "floor_number": 2}"#).expect("form parses");
        assert_eq!(form.room_id, Some(None));
        assert_eq!(form.floor_number, Some(2));

        let form: RoomForm = serde_json::from_str(r#"{"room_id": 4}"#).expect("form parses");
        assert_eq!(form.room_id, Some(Some(4)));
    }

    #[test]
    fn dates_accept_datetime_suffix() {
        let form: RoomForm =
            serde_json::from_str(r#"{"lease_start_date": "2024-03-01T00:00:00"}"#).expect("parses");
        assert_eq!(form.lease_start_date, NaiveDate::from_ymd_opt(2024, 3, 1));

        assert!(serde_json::from_str::<RoomForm>(r#"{"lease_start_date": "March"}"#).is_err());
    }
}
