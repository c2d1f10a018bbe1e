/// Snapshot of a club document as read once at dispatch time. Subscriber
/// changes that land after the lookup are not observed by an in-flight
/// notification.
#[derive(Debug, Clone, PartialEq)]
pub struct Club {
    pub id: String,
    pub name: Option<String>,
    pub photo_url: Option<String>,
    pub subscribers: Vec<String>,
}
