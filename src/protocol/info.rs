// src/protocol/info.rs
//
// Info replies are free text such as
// `#name=Foo[world=Bar] //Rules: no-pvp //ReMix 1.2`. There is no escaping, so
// extraction goes by substring position and tolerates anything else.
use crate::models::server::{ServerType, UNKNOWN_SERVER_NAME};
use crate::protocol::decode_latin1;

const SENTINEL: &str = "#name=";
const SEGMENT_DELIMITER: &str = " //";
const NAME_MARKER: &str = "name=";
const WORLD_MARKER: &str = "[world=";
const RULES_MARKER: &str = "ules: ";
const REMIX_MARKER: &str = "ReMix";

/// Fields scraped from an info reply. Every field is optional; a reply without
/// the `#name=` sentinel yields the empty value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerDetails {
    pub name: Option<String>,
    pub world: Option<String>,
    pub rules: Option<String>,
    pub version: Option<String>,
    pub server_type: Option<ServerType>,
}

impl ServerDetails {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNKNOWN_SERVER_NAME)
    }

    pub fn server_type(&self) -> ServerType {
        self.server_type.unwrap_or_default()
    }
}

pub fn parse_server_info(data: &[u8]) -> ServerDetails {
    let text = decode_latin1(data);
    let mut details = ServerDetails::default();

    if !text.starts_with(SENTINEL) {
        return details;
    }

    for segment in text.split(SEGMENT_DELIMITER) {
        if let Some(pos) = segment.find(NAME_MARKER) {
            let rest = &segment[pos + NAME_MARKER.len()..];
            let rest = rest.find(NAME_MARKER).map_or(rest, |end| &rest[..end]);
            let name = rest.find(WORLD_MARKER).map_or(rest, |end| &rest[..end]);
            details.name = Some(name.trim().to_string());

            if let Some(pos) = segment.find(WORLD_MARKER) {
                let rest = &segment[pos + WORLD_MARKER.len()..];
                let world = rest.find(']').map_or(rest, |end| &rest[..end]);
                details.world = Some(world.trim().to_string());
            }
        } else if let Some(pos) = segment.find(RULES_MARKER) {
            details.rules = Some(segment[pos + RULES_MARKER.len()..].trim().to_string());
        } else if segment.contains(REMIX_MARKER) {
            details.version = Some(segment.trim().to_string());
            details.server_type = Some(ServerType::ReMix);
        }
    }

    if details.server_type.is_none() {
        details.server_type = Some(ServerType::Mix);
    }

    details
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_segments() {
        let details = parse_server_info(b"#name=Foo[world=Bar] //ules: no-pvp //ReMix 1.2");

        assert_eq!(details.name.as_deref(), Some("Foo"));
        assert_eq!(details.world.as_deref(), Some("Bar"));
        assert_eq!(details.rules.as_deref(), Some("no-pvp"));
        assert_eq!(details.version.as_deref(), Some("ReMix 1.2"));
        assert_eq!(details.server_type(), ServerType::ReMix);
    }

    #[test]
    fn missing_sentinel_yields_empty_details() {
        let details = parse_server_info(b"name=Foo[world=Bar]");

        assert!(details.is_empty());
        assert_eq!(details.display_name(), UNKNOWN_SERVER_NAME);
        assert_eq!(details.server_type(), ServerType::Mix);
        assert!(parse_server_info(b"").is_empty());
    }

    #[test]
    fn strips_null_padding_and_defaults_to_mix() {
        let details = parse_server_info(b"#name= Spell Haven \0\0\0 //Rules: pk on\0");

        assert_eq!(details.name.as_deref(), Some("Spell Haven"));
        assert_eq!(details.world, None);
        assert_eq!(details.rules.as_deref(), Some("pk on"));
        assert_eq!(details.server_type, Some(ServerType::Mix));
        assert_eq!(details.version, None);
    }

    #[test]
    fn unterminated_world_takes_rest_of_segment() {
        let details = parse_server_info(b"#name=Foo[world=Open Plains");

        assert_eq!(details.name.as_deref(), Some("Foo"));
        assert_eq!(details.world.as_deref(), Some("Open Plains"));
    }

    #[test]
    fn latin1_bytes_survive_decoding() {
        let details = parse_server_info(b"#name=Caf\xe9");

        assert_eq!(details.name.as_deref(), Some("Caf\u{e9}"));
    }
}
