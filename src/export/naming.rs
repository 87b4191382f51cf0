const APP_NAME: &str = "Plastered";

/// `Plastered-<album>.png`, or `Plastered-poster.png` for a blank album name.
///
/// Path separators and control characters in the album name become `_`.
pub fn export_file_name(album_name: &str) -> String {
    let album = album_name.trim();
    if album.is_empty() {
        return format!("{APP_NAME}-poster.png");
    }
    let safe: String = album
        .chars()
        .map(|c| match c {
            '/' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    format!("{APP_NAME}-{safe}.png")
}

#[cfg(test)]
#[path = "../../tests/unit/export/naming.rs"]
mod tests;
