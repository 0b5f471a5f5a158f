use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

/// One user as returned by the roster endpoint. Keys may be absent from
/// individual records; absent keys end up as NULL in the database.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub id_number: Option<f64>,
    #[serde(default)]
    pub national_id: Option<String>,
}

/// POST the roster endpoint and return every record in the response.
/// Any non-success status is an error; there is no retry.
pub async fn fetch_users(url: &str, token: &str) -> Result<Vec<UserRecord>> {
    let client = reqwest::Client::new();
    let body: Value = client
        .post(url)
        .bearer_auth(token)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await
        .context("Roster API returned a non-JSON body")?;

    let records = parse_records(&body)?;
    info!("Fetched {} records from {}", records.len(), url);
    Ok(records)
}

/// Read the `value` array of a roster response. A missing or non-array
/// field is an empty result, not an error; a record with a wrongly-typed
/// key is an error.
pub fn parse_records(body: &Value) -> Result<Vec<UserRecord>> {
    let Some(items) = body.get("value").and_then(Value::as_array) else {
        return Ok(Vec::new());
    };
    items
        .iter()
        .map(|item| {
            serde_json::from_value(item.clone()).context("Malformed record in roster response")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_well_formed_records() {
        let body = json!({
            "value": [
                { "name": "Ana Souza", "id_number": 1042, "national_id": "390533447" },
                { "name": "Bruno Lima", "id_number": 2077.5, "national_id": "718204331" },
            ]
        });
        let records = parse_records(&body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name.as_deref(), Some("Ana Souza"));
        assert_eq!(records[0].id_number, Some(1042.0));
        assert_eq!(records[1].national_id.as_deref(), Some("718204331"));
    }

    #[test]
    fn missing_value_field_is_empty() {
        let records = parse_records(&json!({ "count": 0 })).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn empty_array_is_empty() {
        let records = parse_records(&json!({ "value": [] })).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn absent_keys_become_none() {
        let body = json!({ "value": [ { "name": "Carla Dias" } ] });
        let records = parse_records(&body).unwrap();
        assert_eq!(records[0].name.as_deref(), Some("Carla Dias"));
        assert_eq!(records[0].id_number, None);
        assert_eq!(records[0].national_id, None);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let body = json!({
            "value": [ { "name": "Davi Nunes", "department": "Finance" } ]
        });
        let records = parse_records(&body).unwrap();
        assert_eq!(records[0].name.as_deref(), Some("Davi Nunes"));
    }

    #[test]
    fn wrongly_typed_key_is_an_error() {
        let body = json!({ "value": [ { "name": 42 } ] });
        assert!(parse_records(&body).is_err());
    }
}
