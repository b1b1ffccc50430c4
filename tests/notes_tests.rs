// tests/notes_tests.rs
use autoupdater::model::{ReleaseNotes, UpdateInfo};
use autoupdater::notes::{html, link_issues, plain_text, DEFAULT_WIDTH};

fn release(version: &str, date: Option<&str>, notes: &str) -> ReleaseNotes {
    ReleaseNotes {
        version: version.into(),
        date: date.map(String::from),
        notes: notes.into(),
    }
}

fn single(notes: &str) -> UpdateInfo {
    UpdateInfo::new("1.11.0", vec![release("1.11.0", Some("2024-03-01"), notes)])
}

#[test]
fn plain_text_strips_markup() {
    let info = single("New **break** timer.\n\n- Fix #123\n- Add `code` support");
    assert_eq!(
        plain_text(&info, DEFAULT_WIDTH),
        "Version 1.11.0 (2024-03-01)\n\nNew break timer.\n\n• Fix #123\n• Add code support"
    );
}

#[test]
fn plain_text_wraps_paragraphs() {
    let info = single("one two three four five six seven");
    let text = plain_text(&info, 20);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[2], "one two three four");
    assert_eq!(lines[3], "five six seven");
    assert!(lines[2..].iter().all(|l| l.chars().count() <= 20));
}

#[test]
fn list_items_hang_under_the_marker() {
    let info = single("- alpha beta gamma delta epsilon");
    let text = plain_text(&info, 20);
    let lines: Vec<&str> = text.lines().skip(2).collect();
    assert_eq!(lines, vec!["• alpha beta gamma", "  delta epsilon"]);
}

#[test]
fn ordered_lists_keep_numbers() {
    let info = single("1. one\n2. two");
    let text = plain_text(&info, DEFAULT_WIDTH);
    assert!(text.ends_with("1. one\n2. two"));
}

#[test]
fn links_show_their_target() {
    let info = single("See [the site](https://example.org).\n\nOr <https://example.org>.");
    let text = plain_text(&info, DEFAULT_WIDTH);
    assert!(text.contains("See the site <https://example.org>."));
    assert!(text.contains("Or https://example.org."));
}

#[test]
fn releases_are_listed_in_order() {
    let info = UpdateInfo::new(
        "1.11.0",
        vec![
            release("1.11.0", None, "Latest."),
            release("1.10.1", Some("2023-12-24"), ""),
        ],
    );
    assert_eq!(
        plain_text(&info, DEFAULT_WIDTH),
        "Version 1.11.0\n\nLatest.\n\nVersion 1.10.1 (2023-12-24)"
    );
}

#[test]
fn no_releases_gives_empty_text() {
    let info = UpdateInfo::new("1.11.0", vec![]);
    assert_eq!(plain_text(&info, DEFAULT_WIDTH), "");
}

#[test]
fn html_document_per_release() {
    let info = single("New **break** timer.\n\n- Fix #123");
    let doc = html(&info);
    assert!(doc.starts_with("<!DOCTYPE html>"));
    assert!(doc.contains("<h1>Version 1.11.0 is available</h1>"));
    assert!(doc.contains("<h2>Version 1.11.0 <small>(2024-03-01)</small></h2>"));
    assert!(doc.contains("<strong>break</strong>"));
    assert!(doc.contains("<li>Fix #123</li>"));
    assert_eq!(doc.matches("<section>").count(), 1);
}

#[test]
fn html_escapes_title() {
    let info = single("").with_title("Fast & <small>");
    let doc = html(&info);
    assert!(doc.contains("<h1>Fast &amp; &lt;small&gt;</h1>"));
    assert!(doc.contains("<title>Fast &amp; &lt;small&gt;</title>"));
}

#[test]
fn wide_characters_count_double() {
    let info = single("漢字漢字 漢字漢字");
    let text = plain_text(&info, 10);
    let lines: Vec<&str> = text.lines().skip(2).collect();
    assert_eq!(lines, vec!["漢字漢字", "漢字漢字"]);
}

#[test]
fn issue_references_become_links() {
    assert_eq!(
        link_issues("Fix #12 and #7.", Some("https://example.org/issues/")),
        "Fix [#12](https://example.org/issues/12) and [#7](https://example.org/issues/7)."
    );
    assert_eq!(link_issues("Fix #12", None), "Fix #12");
    assert_eq!(
        link_issues("See [#3](https://x.org/3) and page#4", Some("https://example.org/issues")),
        "See [#3](https://x.org/3) and page#4"
    );
}

#[test]
fn issue_links_on_both_surfaces() {
    let info = single("- Fix #123").with_issue_url("https://example.org/issues");

    let text = plain_text(&info, DEFAULT_WIDTH);
    assert!(text.ends_with("• Fix #123 <https://example.org/issues/123>"));

    let doc = html(&info);
    assert!(doc.contains("<a href=\"https://example.org/issues/123\">#123</a>"));
}

#[test]
fn block_quotes_keep_their_marker() {
    let info = single("Intro.\n\n> quote here\n\nAfter.");
    let text = plain_text(&info, DEFAULT_WIDTH);
    let lines: Vec<&str> = text.lines().skip(2).collect();
    assert_eq!(lines, vec!["Intro.", "", "> quote here", "", "After."]);
}

#[test]
fn code_blocks_are_indented_verbatim() {
    let info = single("Intro.\n\n```\nfn main() {}\n```");
    let text = plain_text(&info, DEFAULT_WIDTH);
    let lines: Vec<&str> = text.lines().skip(2).collect();
    assert_eq!(lines, vec!["Intro.", "", "    fn main() {}"]);
}

#[test]
fn nested_lists_are_indented() {
    let info = single("- outer\n  - inner\n- next");
    let text = plain_text(&info, DEFAULT_WIDTH);
    let lines: Vec<&str> = text.lines().skip(2).collect();
    assert_eq!(lines, vec!["• outer", "  • inner", "• next"]);
}
