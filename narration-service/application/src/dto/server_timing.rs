use serde::{Deserialize, Serialize};

use narration_domain::{TimingEntry, TimingSequence};

use crate::ApplicationError;

/// Word timing record as returned by the text-to-speech endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerTiming {
    pub text: String,
    pub time: f64,
    pub end: f64,
}

impl From<ServerTiming> for TimingEntry {
    fn from(timing: ServerTiming) -> Self {
        TimingEntry::new(timing.text, timing.time, timing.end)
    }
}

pub fn parse_server_timings(json: &str) -> Result<TimingSequence, ApplicationError> {
    let timings: Vec<ServerTiming> = serde_json::from_str(json)
        .map_err(|err| ApplicationError::Validation(format!("invalid timing payload: {err}")))?;
    Ok(timings
        .into_iter()
        .map(TimingEntry::from)
        .collect::<Vec<_>>()
        .into())
}

#[cfg(test)]
mod tests {
    use super::parse_server_timings;

    #[test]
    fn parses_server_records_in_order() {
        let timings = parse_server_timings(
            r#"[{"text":"Cells","time":0.0,"end":0.4},{"text":"divide.","time":0.4,"end":1.1}]"#,
        )
        .expect("payload parses");

        assert_eq!(timings.len(), 2);
        assert_eq!(timings.entries()[1].token, "divide.");
        assert_eq!(timings.entries()[1].start, 0.4);
        assert_eq!(timings.entries()[1].end, 1.1);
    }

    #[test]
    fn rejects_malformed_payload() {
        assert!(parse_server_timings(r#"{"text":"x"}"#).is_err());
    }
}
