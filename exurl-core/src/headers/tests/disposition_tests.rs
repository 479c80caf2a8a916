use crate::headers::{attachment_disposition, download_name};
use pretty_assertions::assert_eq;
use url::Url;

fn name_of(raw: &str) -> String {
    download_name(&Url::parse(raw).unwrap())
}

#[test]
fn uses_last_path_segment() {
    assert_eq!(name_of("https://x.example/a/b/photo.jpg"), "photo.jpg");
    assert_eq!(name_of("https://x.example/photo.jpg?size=large#top"), "photo.jpg");
}

#[test]
fn falls_back_when_segment_is_empty() {
    assert_eq!(name_of("https://x.example"), "download");
    assert_eq!(name_of("https://x.example/"), "download");
    assert_eq!(name_of("https://x.example/dir/"), "download");
}

#[test]
fn encodes_as_uri_component() {
    assert_eq!(
        name_of("https://x.example/files/report%20final.pdf"),
        "report%20final.pdf"
    );
    assert_eq!(
        name_of("https://x.example/files/a;b=c,d.txt"),
        "a%3Bb%3Dc%2Cd.txt"
    );
    assert_eq!(name_of("https://x.example/(draft)*!~'_-.md"), "(draft)*!~'_-.md");
}

#[test]
fn non_ascii_names_are_utf8_encoded() {
    assert_eq!(
        name_of("https://x.example/%ED%8C%8C%EC%9D%BC.txt"),
        "%ED%8C%8C%EC%9D%BC.txt"
    );
}

#[test]
fn quotes_cannot_escape_the_filename_parameter() {
    let value = attachment_disposition(&Url::parse("https://x.example/a%22b.txt").unwrap());
    assert_eq!(value, "attachment; filename=\"a%22b.txt\"");
}
