use serde::Serialize;
use serde_json::{json, Value};

use crate::ClientError;

/// Optional modifiers for reading and observing events. Unset fields impose no constraint and
/// are left out of the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower_bound: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_lower_bound_event: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_by_event_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recursive: Option<bool>,
}

impl StreamOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lower_bound(mut self, cursor: impl Into<String>) -> Self {
        self.lower_bound = Some(cursor.into());
        self
    }

    pub fn include_lower_bound_event(mut self, include: bool) -> Self {
        self.include_lower_bound_event = Some(include);
        self
    }

    pub fn latest_by_event_type(mut self, event_type: impl Into<String>) -> Self {
        self.latest_by_event_type = Some(event_type.into());
        self
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = Some(recursive);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Server-evaluated condition attached to a commit. The payload is forwarded verbatim.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Precondition {
    #[serde(rename = "type")]
    pub kind: String,
    pub payload: Value,
}

impl Precondition {
    pub fn new(kind: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: kind.into(),
            payload,
        }
    }

    /// The commit is accepted only if `subject` has no events yet.
    pub fn is_subject_pristine(subject: impl Into<String>) -> Self {
        Self::new("isSubjectPristine", json!({ "subject": subject.into() }))
    }

    /// The commit is accepted only if the latest event of `subject` has id `event_id`.
    pub fn is_subject_on_event_id(subject: impl Into<String>, event_id: impl Into<String>) -> Self {
        Self::new(
            "isSubjectOnEventId",
            json!({ "subject": subject.into(), "eventId": event_id.into() }),
        )
    }
}

/// An event to be committed; the server assigns id and time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventCandidate {
    pub source: String,
    pub subject: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: Value,
}

impl EventCandidate {
    pub fn new(
        source: impl Into<String>,
        subject: impl Into<String>,
        event_type: impl Into<String>,
        data: Value,
    ) -> Self {
        Self {
            source: source.into(),
            subject: subject.into(),
            event_type: event_type.into(),
            data,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SubjectRequest<'a> {
    pub(crate) subject: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) options: Option<&'a StreamOptions>,
}

impl<'a> SubjectRequest<'a> {
    pub(crate) fn new(subject: &'a str, options: Option<&'a StreamOptions>) -> Self {
        Self {
            subject,
            options: options.filter(|options| !options.is_empty()),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct QueryRequest<'a> {
    pub(crate) query: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ReadSubjectsRequest<'a> {
    pub(crate) base_subject: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct WriteEventsRequest<'a> {
    pub(crate) events: &'a [EventCandidate],
    #[serde(skip_serializing_if = "no_preconditions")]
    pub(crate) preconditions: &'a [Precondition],
}

fn no_preconditions(preconditions: &&[Precondition]) -> bool {
    preconditions.is_empty()
}

pub(crate) fn validate_subject(subject: &str) -> Result<(), ClientError> {
    if subject.trim().is_empty() {
        return Err(ClientError::InvalidRequest("subject must not be empty".to_string()));
    }
    if !subject.starts_with('/') {
        return Err(ClientError::InvalidRequest(format!(
            "subject `{subject}` must start with `/`"
        )));
    }
    Ok(())
}
