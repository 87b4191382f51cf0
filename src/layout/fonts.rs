use crate::content::model::FontChoice;

/// Platform-neutral stack substituted for the `System` font choice.
pub const SYSTEM_FONT_STACK: &str =
    r#"system-ui, -apple-system, "Segoe UI", Roboto, "Helvetica Neue", Arial"#;

/// CSS-like family string for a font choice.
///
/// Lists (anything with a comma) are used verbatim; single names containing whitespace are
/// quoted so the stack parser keeps them whole.
pub fn resolve_family(choice: &FontChoice) -> String {
    match choice {
        FontChoice::System => SYSTEM_FONT_STACK.to_string(),
        FontChoice::Named(name) => format_family(name),
    }
}

fn format_family(name: &str) -> String {
    let name = name.trim();
    if name.contains(',') {
        return name.to_string();
    }
    if name.contains(char::is_whitespace) && !(name.starts_with('"') && name.ends_with('"')) {
        return format!("\"{name}\"");
    }
    name.to_string()
}

#[cfg(test)]
#[path = "../../tests/unit/layout/fonts.rs"]
mod tests;
