use super::*;

#[test]
fn album_name_is_embedded() {
    assert_eq!(export_file_name("Test Album"), "Plastered-Test Album.png");
}

#[test]
fn blank_album_falls_back_to_poster() {
    assert_eq!(export_file_name(""), "Plastered-poster.png");
    assert_eq!(export_file_name("   "), "Plastered-poster.png");
}

#[test]
fn separators_cannot_escape_the_directory() {
    assert_eq!(export_file_name("AC/DC"), "Plastered-AC_DC.png");
    assert_eq!(export_file_name("a\\b\nc"), "Plastered-a_b_c.png");
}
