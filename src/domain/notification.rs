use std::collections::HashMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::club::Club;
use crate::domain::event::EventFields;

pub const NOTIFICATION_TYPE_NEW_EVENT: &str = "new_event";

const CLICK_ACTION: &str = "FLUTTER_NOTIFICATION_CLICK";
const FALLBACK_EVENT_TITLE: &str = "Untitled Event";
const FALLBACK_EVENT_NAME: &str = "an event";
const FALLBACK_CLUB_NAME: &str = "A club";
const FALLBACK_LOCATION: &str = "TBD";
const FALLBACK_DATE: &str = "soon";

/// Push message content shared by the topic and multicast delivery paths.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationPayload {
    pub title: String,
    pub body: String,
    pub data: HashMap<String, String>,
}

impl NotificationPayload {
    /// Composes the push payload from the event and the club snapshot.
    /// Every field the admin may have left blank falls back to a fixed
    /// placeholder; composition itself never fails.
    pub fn compose(event_id: &str, club: &Club, event: &EventFields) -> Self {
        let event_name = non_empty(event.name.as_deref());
        let title = format!(
            "New Event: {}",
            event_name.unwrap_or(FALLBACK_EVENT_TITLE)
        );

        let date = event
            .date_time
            .as_deref()
            .map(format_event_date)
            .unwrap_or_else(|| FALLBACK_DATE.to_string());

        let body = format!(
            "{} is organizing \"{}\" at {} on {}",
            non_empty(club.name.as_deref()).unwrap_or(FALLBACK_CLUB_NAME),
            event_name.unwrap_or(FALLBACK_EVENT_NAME),
            non_empty(event.location.as_deref()).unwrap_or(FALLBACK_LOCATION),
            date,
        );

        let data = HashMap::from([
            ("eventId".to_string(), event_id.to_string()),
            ("clubId".to_string(), club.id.clone()),
            ("type".to_string(), NOTIFICATION_TYPE_NEW_EVENT.to_string()),
            ("click_action".to_string(), CLICK_ACTION.to_string()),
        ]);

        Self { title, body, data }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Human-readable start date, e.g. "Mar 15, 04:00 PM". An unparseable
/// value degrades to "soon" instead of aborting the notification.
fn format_event_date(raw: &str) -> String {
    match parse_date_time(raw) {
        Some(date) => date.format("%b %-d, %I:%M %p").to_string(),
        None => {
            tracing::warn!(raw, "failed to parse event date, using placeholder");
            FALLBACK_DATE.to_string()
        }
    }
}

fn parse_date_time(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.naive_utc());
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// Persisted notification history record. One per event-creation trigger;
/// the id is derived from the event id so a redelivered trigger collapses
/// into the same document instead of duplicating it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub event_id: String,
    pub club_id: String,
    pub photo_url: Option<String>,
    pub notification_type: String,
    pub read_status: HashMap<String, bool>,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn for_event(event_id: &str, club: &Club, payload: &NotificationPayload) -> Self {
        let read_status = club
            .subscribers
            .iter()
            .filter(|user_id| !user_id.is_empty())
            .map(|user_id| (user_id.clone(), false))
            .collect();

        Self {
            id: Uuid::new_v5(&Uuid::NAMESPACE_OID, event_id.as_bytes()),
            title: payload.title.clone(),
            body: payload.body.clone(),
            event_id: event_id.to_string(),
            club_id: club.id.clone(),
            photo_url: club.photo_url.clone(),
            notification_type: NOTIFICATION_TYPE_NEW_EVENT.to_string(),
            read_status,
            created_at: Utc::now(),
        }
    }
}
