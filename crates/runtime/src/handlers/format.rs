//! Built-in placeholder substitution.

use obituary_core::{DamageType, Location};

/// Values available to `{token}` placeholders.
#[derive(Debug, Clone, Default)]
pub struct MessageTokens<'a> {
    pub player: &'a str,
    pub killer: Option<&'a str>,
    pub location: Option<&'a Location>,
    pub damage_type: Option<DamageType>,
}

impl MessageTokens<'_> {
    fn lookup(&self, token: &str) -> Option<String> {
        match token {
            "player" => Some(self.player.to_string()),
            "killer" | "aggressor" => self.killer.map(str::to_string),
            "world" => self.location.map(|loc| loc.world.clone()),
            "x" => self.location.map(|loc| loc.block().0.to_string()),
            "y" => self.location.map(|loc| loc.block().1.to_string()),
            "z" => self.location.map(|loc| loc.block().2.to_string()),
            "damage_type" => self
                .damage_type
                .map(|kind| kind.to_string().to_lowercase()),
            _ => None,
        }
    }
}

/// Replaces known `{token}`s in one left-to-right pass.
///
/// Unknown tokens, and tokens without a value (such as `{killer}` on an
/// environmental death), are left verbatim for the placeholder service.
/// A brace that does not open a token stays literal.
/// Substituted values are never rescanned, so a player named `{killer}`
/// stays literal.
pub fn render(template: &str, tokens: &MessageTokens<'_>) -> String {
    let mut out = String::with_capacity(template.len() + 16);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            return out;
        };

        let token = &after[..close];
        // A lone `{` is literal; rescan from the last brace before `}`.
        if let Some(inner) = token.rfind('{') {
            out.push('{');
            out.push_str(&token[..inner]);
            rest = &after[inner..];
            continue;
        }

        match tokens.lookup(token) {
            Some(value) => out.push_str(&value),
            None => {
                out.push('{');
                out.push_str(token);
                out.push('}');
            }
        }
        rest = &after[close + 1..];
    }

    out.push_str(rest);
    out
}
