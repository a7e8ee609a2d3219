use once_cell::sync::Lazy;
use regex::Regex;

/// Identifiers carried by a message link (`.../guild/channel/message`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageLink {
    pub guild_id: u64,
    pub channel_id: u64,
    pub message_id: u64,
}

/// `/guild/channel/message` id triple, anywhere in the text.
static RE_MESSAGE_LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"/(\d+)/(\d+)/(\d+)").unwrap());

/// Extract the first `/guild/channel/message` triple from free text.
///
/// Returns `None` when no triple is present or an id does not fit in a `u64`.
pub fn parse_message_link(text: &str) -> Option<MessageLink> {
    let caps = RE_MESSAGE_LINK.captures(text)?;
    let id = |i: usize| caps.get(i)?.as_str().parse::<u64>().ok();

    Some(MessageLink {
        guild_id: id(1)?,
        channel_id: id(2)?,
        message_id: id(3)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_message_link() {
        let link = parse_message_link(
            "https://discord.com/channels/1211760623969370122/1211760624422367312/1243003311453474868",
        )
        .unwrap();
        assert_eq!(link.guild_id, 1211760623969370122);
        assert_eq!(link.channel_id, 1211760624422367312);
        assert_eq!(link.message_id, 1243003311453474868);
    }

    #[test]
    fn finds_triple_inside_surrounding_text() {
        assert_eq!(
            parse_message_link("check /1/2/3 please"),
            Some(MessageLink { guild_id: 1, channel_id: 2, message_id: 3 })
        );
    }

    #[test]
    fn first_match_wins() {
        let link = parse_message_link("/1/2/3 and /4/5/6").unwrap();
        assert_eq!(link.message_id, 3);
    }

    #[test]
    fn rejects_text_without_three_numeric_segments() {
        assert_eq!(parse_message_link("no link here"), None);
        assert_eq!(parse_message_link("/1/2"), None);
        assert_eq!(parse_message_link("/1/x/3"), None);
        assert_eq!(parse_message_link("1/2/3"), None);
    }

    #[test]
    fn rejects_ids_that_overflow() {
        assert_eq!(parse_message_link("/1/2/99999999999999999999999"), None);
    }
}
