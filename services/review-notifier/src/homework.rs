//! Practicum homework status API client and response parsing

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde_json::Value;

use crate::io::HttpClient;
use crate::NotifierError;

/// Review verdict of a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl HomeworkStatus {
    /// Human-readable sentence sent to the user for this verdict
    pub fn verdict(self) -> &'static str {
        match self {
            HomeworkStatus::Approved => {
                "The work has been reviewed: the reviewer liked everything. Hooray!"
            }
            HomeworkStatus::Reviewing => "The work has been taken for review by the reviewer.",
            HomeworkStatus::Rejected => "The work has been reviewed: the reviewer has comments.",
        }
    }
}

impl FromStr for HomeworkStatus {
    type Err = NotifierError;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "approved" => Ok(HomeworkStatus::Approved),
            "reviewing" => Ok(HomeworkStatus::Reviewing),
            "rejected" => Ok(HomeworkStatus::Rejected),
            other => Err(NotifierError::UnknownStatus(other.to_string())),
        }
    }
}

impl fmt::Display for HomeworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HomeworkStatus::Approved => write!(f, "approved"),
            HomeworkStatus::Reviewing => write!(f, "reviewing"),
            HomeworkStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// A validated view over an API response
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    /// Submissions, most recent first
    pub homeworks: &'a [Value],
    /// Server time to use as the next cursor, if the server sent one
    pub current_date: Option<i64>,
}

impl<'a> Snapshot<'a> {
    /// The most recent submission, if any
    pub fn latest(&self) -> Option<&'a Value> {
        self.homeworks.first()
    }
}

/// Client for the homework status endpoint
pub struct HomeworkApi {
    endpoint: String,
    auth_header: String,
    http: Arc<dyn HttpClient>,
}

impl fmt::Debug for HomeworkApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HomeworkApi")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl HomeworkApi {
    pub fn new(endpoint: &str, token: &str, http: Arc<dyn HttpClient>) -> Self {
        tracing::debug!("Created HomeworkApi for {}", endpoint);
        Self {
            endpoint: endpoint.to_string(),
            auth_header: format!("OAuth {}", token),
            http,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch the raw status snapshot for changes since `from_date`
    pub async fn get_api_answer(&self, from_date: i64) -> crate::Result<Value> {
        let from_date_str = from_date.to_string();
        let response = self
            .http
            .get(
                &self.endpoint,
                &[("Authorization", self.auth_header.as_str())],
                &[("from_date", from_date_str.as_str())],
            )
            .await
            .map_err(|e| match e {
                NotifierError::Http(reason) => NotifierError::Connectivity {
                    endpoint: self.endpoint.clone(),
                    from_date,
                    reason,
                },
                other => other,
            })?;

        if response.status != 200 {
            return Err(NotifierError::ApiStatus {
                endpoint: self.endpoint.clone(),
                status: response.status,
            });
        }

        Ok(serde_json::from_str(&response.body)?)
    }
}

/// Name of a JSON value's type, for error messages
fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Validate the shape of an API response.
///
/// `current_date` may be absent; the caller then keeps its previous cursor.
pub fn check_response(response: &Value) -> crate::Result<Snapshot<'_>> {
    let object = response.as_object().ok_or_else(|| {
        NotifierError::Shape(format!(
            "response: expected object, got {}",
            json_type(response)
        ))
    })?;

    let homeworks = object
        .get("homeworks")
        .ok_or_else(|| NotifierError::Shape("response has no `homeworks` key".to_string()))?;

    let homeworks = homeworks.as_array().ok_or_else(|| {
        NotifierError::Shape(format!(
            "`homeworks`: expected array, got {}",
            json_type(homeworks)
        ))
    })?;

    let current_date = match object.get("current_date") {
        None => None,
        Some(value) => Some(value.as_i64().ok_or_else(|| {
            NotifierError::Shape(format!(
                "`current_date`: expected integer, got {}",
                json_type(value)
            ))
        })?),
    };

    Ok(Snapshot {
        homeworks: homeworks.as_slice(),
        current_date,
    })
}

/// Build the notification text for a single submission record
pub fn parse_status(homework: &Value) -> crate::Result<String> {
    let name = string_field(homework, "homework_name")?;
    let status: HomeworkStatus = string_field(homework, "status")?.parse()?;
    tracing::debug!("Latest submission '{}' is {}", name, status);

    Ok(format!(
        "Changed review status for \"{}\". {}",
        name,
        status.verdict()
    ))
}

fn string_field<'a>(record: &'a Value, field: &'static str) -> crate::Result<&'a str> {
    let value = record
        .get(field)
        .ok_or(NotifierError::MissingField(field))?;
    value.as_str().ok_or_else(|| {
        NotifierError::Shape(format!(
            "`{}`: expected string, got {}",
            field,
            json_type(value)
        ))
    })
}
