pub const SHOW: &str = "Show";
pub const HIDE: &str = "Hide";

/// Label for the toggle: it names the action, so a visible passphrase reads "Hide".
pub fn label(show: bool) -> &'static str {
    if show { HIDE } else { SHOW }
}

/// Parse the `show` attribute. Only the literal `"true"` counts.
pub fn parse_show(attribute: Option<&str>) -> bool {
    attribute == Some("true")
}
