//! Plain-text rendering of `PrintJSON` messages.

use crate::command::JsonMessagePart;

/// Resolves the numeric ids embedded in message fragments to names.
///
/// Every method defaults to "unknown", in which case the raw id is shown.
pub trait NameResolver {
    fn player_name(&self, _slot: i64) -> Option<String> {
        None
    }

    fn item_name(&self, _item: i64) -> Option<String> {
        None
    }

    fn location_name(&self, _location: i64) -> Option<String> {
        None
    }
}

/// Resolver that knows no names.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawIds;

impl NameResolver for RawIds {}

/// Concatenate message fragments into one line of text.
///
/// Fragments of type `player_id`, `item_id` and `location_id` carry a
/// numeric id in `text` and are resolved through `names`. Color and
/// formatting fragments render as their text.
pub fn render(parts: &[JsonMessagePart], names: &dyn NameResolver) -> String {
    let mut out = String::new();
    for part in parts {
        let resolved = match part.kind.as_deref() {
            Some("player_id") => part.text.parse().ok().and_then(|id| names.player_name(id)),
            Some("item_id") => part.text.parse().ok().and_then(|id| names.item_name(id)),
            Some("location_id") => part
                .text
                .parse()
                .ok()
                .and_then(|id| names.location_name(id)),
            _ => None,
        };
        out.push_str(resolved.as_deref().unwrap_or(&part.text));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct OnePlayer;

    impl NameResolver for OnePlayer {
        fn player_name(&self, slot: i64) -> Option<String> {
            (slot == 1).then(|| "Robo".to_string())
        }
    }

    fn part(text: &str, kind: Option<&str>) -> JsonMessagePart {
        JsonMessagePart {
            text: text.to_string(),
            kind: kind.map(str::to_string),
            ..JsonMessagePart::default()
        }
    }

    #[test]
    fn test_render_plain() {
        let parts = [part("Hello ", None), part("world", Some("color"))];
        assert_eq!(render(&parts, &RawIds), "Hello world");
    }

    #[test]
    fn test_render_resolves_ids() {
        let parts = [
            part("1", Some("player_id")),
            part(" sent ", None),
            part("2", Some("player_id")),
            part(" ", None),
            part("2322432", Some("item_id")),
        ];
        assert_eq!(render(&parts, &OnePlayer), "Robo sent 2 2322432");
    }
}
