//! Names shared by the file link syntaxes, tokens and markup.

/// Kind of the inline token emitted for a file link.
pub const FILE_TOKEN: &str = "yfm_file";

/// Opening markup of the bracket syntax, trailing separator included.
pub const PREFIX: &str = "{% file ";

/// Markup recorded on tokens produced by the directive syntax.
pub const DIRECTIVE_MARKUP: &str = ":file";

/// Directive name handled by [`FileDirective`](crate::FileDirective).
pub const DIRECTIVE_NAME: &str = "file";

/// Name of the bracket syntax inline rule.
pub const RULE_NAME: &str = "yfm_file_inline";

/// Name of the core rule that records page assets.
pub const ASSETS_RULE_NAME: &str = "yfm_file_after";

/// Render environment flag set whenever a file link is emitted.
pub const ENV_FLAG_NAME: &str = "has-yfm-file";

/// Class of the link element.
pub const LINK_CLASS: &str = "yfm-file";

/// Class of the icon element inside the link.
pub const ICON_CLASS: &str = "yfm-file__icon";

/// Stylesheet reference used when no runtime is configured.
pub const DEFAULT_RUNTIME_STYLE: &str = "_assets/file-extension.css";

/// Attributes accepted by the bracket syntax; anything else is dropped.
pub const KNOWN_ATTRS: [&str; 7] = [
    "src",
    "name",
    "lang",
    "referrerpolicy",
    "rel",
    "target",
    "type",
];

/// Attributes the bracket syntax cannot do without.
pub const REQUIRED_ATTRS: [&str; 2] = ["src", "name"];

/// Bracket syntax attribute names that differ from their link counterparts.
pub const FILE_TO_LINK_ATTRS: [(&str, &str); 3] =
    [("src", "href"), ("name", "download"), ("lang", "hreflang")];

/// Link attributes copied from a directive's `{...}` group, in output order.
pub const DIRECTIVE_ALLOWED_ATTRS: [&str; 5] =
    ["referrerpolicy", "rel", "target", "type", "hreflang"];
