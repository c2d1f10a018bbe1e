use serde::Deserialize;

/// Message published by the platform when an administrator creates an event.
#[derive(Debug, Clone, Deserialize)]
pub struct EventCreated {
    pub event_id: String,
    #[serde(default)]
    pub event: EventFields,
}

/// Raw event document fields. Nothing upstream validates the admin input,
/// so every field is optional and defaulted at payload-composition time.
/// `date_time` stays a raw string until formatting; an unparseable value
/// must degrade to a placeholder, not abort the invocation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EventFields {
    pub name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub date_time: Option<String>,
    pub organizer_id: Option<String>,
    pub poster_url: Option<String>,
}
