//! Conferencing-control documents (TwiML).
//!
//! The provider interprets this declarative markup to bridge an incoming
//! caller into a named conference room, start recording, and register the
//! webhook callbacks this service listens on. No pipeline logic lives here.

const HOLD_MUSIC_URL: &str = "http://twimlets.com/holdmusic?Bucket=com.twilio.music.classical";

/// Instruction document telling the provider to merge a caller into the
/// shared conference room with recording enabled.
///
/// Policy: the conference starts as soon as anyone joins and persists when
/// participants leave (`endConferenceOnExit="false"`).
#[derive(Debug, Clone)]
pub struct ConferenceDirective {
    room: String,
    recording_callback: String,
    status_callback: String,
    wait_url: String,
}

impl ConferenceDirective {
    pub fn new(room: impl Into<String>, public_base_url: &str) -> Self {
        let base = public_base_url.trim_end_matches('/');
        Self {
            room: room.into(),
            recording_callback: format!("{base}/recording-callback"),
            status_callback: format!("{base}/conference-status"),
            wait_url: HOLD_MUSIC_URL.to_string(),
        }
    }

    pub fn room(&self) -> &str {
        &self.room
    }

    pub fn to_xml(&self) -> String {
        format!(
            concat!(
                r#"<?xml version="1.0" encoding="UTF-8"?>"#,
                "<Response><Dial><Conference ",
                r#"startConferenceOnEnter="true" "#,
                r#"endConferenceOnExit="false" "#,
                r#"record="true" "#,
                r#"recordingStatusCallback="{recording_callback}" "#,
                r#"recordingStatusCallbackEvent="in-progress completed" "#,
                r#"recordingStatusCallbackMethod="POST" "#,
                r#"statusCallback="{status_callback}" "#,
                r#"statusCallbackEvent="start end join leave" "#,
                r#"statusCallbackMethod="POST" "#,
                r#"waitUrl="{wait_url}">"#,
                "{room}</Conference></Dial></Response>",
            ),
            recording_callback = escape_xml(&self.recording_callback),
            status_callback = escape_xml(&self.status_callback),
            wait_url = escape_xml(&self.wait_url),
            room = escape_xml(&self.room),
        )
    }
}

fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directive_bridges_into_named_room() {
        let directive = ConferenceDirective::new("MeetingRoom", "https://example.com/");
        let xml = directive.to_xml();

        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains(">MeetingRoom</Conference>"));
        assert!(xml.contains(r#"record="true""#));
    }

    #[test]
    fn test_conference_persists_when_participants_leave() {
        let xml = ConferenceDirective::new("MeetingRoom", "https://example.com").to_xml();

        assert!(xml.contains(r#"startConferenceOnEnter="true""#));
        assert!(xml.contains(r#"endConferenceOnExit="false""#));
    }

    #[test]
    fn test_directive_registers_both_callbacks() {
        let xml = ConferenceDirective::new("MeetingRoom", "https://example.com").to_xml();

        assert!(xml.contains(r#"recordingStatusCallback="https://example.com/recording-callback""#));
        assert!(xml.contains(r#"recordingStatusCallbackEvent="in-progress completed""#));
        assert!(xml.contains(r#"statusCallback="https://example.com/conference-status""#));
        assert!(xml.contains(r#"statusCallbackEvent="start end join leave""#));
    }

    #[test]
    fn test_attribute_values_are_escaped() {
        let directive = ConferenceDirective::new("R&D <Sync>", "https://example.com");
        let xml = directive.to_xml();

        assert!(xml.contains(">R&amp;D &lt;Sync&gt;</Conference>"));
        // The hold music URL carries a query string; its separators must
        // survive escaping intact.
        assert!(xml.contains("holdmusic?Bucket=com.twilio.music.classical"));
    }
}
