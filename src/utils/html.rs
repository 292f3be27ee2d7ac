use std::collections::HashSet;

/// Strip markup from free text that ends up rendered back to visitors.
///
/// Every tag is removed (script and style together with their content).
/// The result is plain text, not HTML: ammonia's entity escaping is undone
/// so "Tom & Jerry" is stored as typed, and it must be escaped on output.
pub fn clean_html(input: &str) -> String {
    let dropped: HashSet<&str> = ["script", "style"].into_iter().collect();

    let cleaned = ammonia::Builder::empty()
        .clean_content_tags(dropped)
        .clean(input)
        .to_string();

    unescape_text(&cleaned)
}

/// Reverses the escaping html5ever applies to text nodes. `&amp;` goes last
/// so that escaped entities such as `&amp;lt;` decode only once.
fn unescape_text(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", "\u{a0}")
        .replace("&amp;", "&")
}
