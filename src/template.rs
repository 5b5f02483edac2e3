//! Embedded configuration template used by the `init` command.

/// Return the template config document text.
pub fn load_template() -> &'static str {
    include_str!("template.msi.toml")
}
