//! Markdown-to-HTML formatting for bot replies.
//!
//! Handles the small subset the remote assistant emits: `**bold**`,
//! `*italic*`, and unordered/ordered lists. Matches the shipped widget
//! behavior, including its quirks: the inline pass runs before list
//! detection, and a list container closes only when the text ends on an
//! item.

use std::sync::LazyLock;

use regex::Regex;

static STRONG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());
static EM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*(.*?)\*").unwrap());
static UL_ITEM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\* (.+)$").unwrap());
static OL_ITEM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\. (.+)$").unwrap());

/// Formatting options.
#[derive(Debug, Clone, Copy)]
pub struct MarkdownOptions {
    /// Convert `* item` and `1. item` lines into list markup.
    pub lists: bool,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self { lists: true }
    }
}

/// State of the line scanner with respect to list items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListState {
    Normal,
    Unordered,
    Ordered,
}

/// Converts the supported Markdown subset to HTML.
///
/// Emphasis is rewritten first across the whole text, then lines are scanned
/// for list items. Because the inline pass goes first, a `* ` marker sharing
/// a line with a later `*` is consumed as italics and never becomes an item.
/// Substitutions are non-recursive and no escaping is performed; malformed
/// or nested markers can produce incorrectly nested tags.
pub fn to_html(text: &str, options: &MarkdownOptions) -> String {
    let inline = render_inline(text);
    if !options.lists {
        return inline;
    }
    render_lists(&inline)
}

/// Applies `**strong**` then `*em*` substitutions. Both are non-greedy and
/// never match across lines.
fn render_inline(text: &str) -> String {
    let strong = STRONG_RE.replace_all(text, "<strong>$1</strong>");
    EM_RE.replace_all(&strong, "<em>$1</em>").into_owned()
}

/// Rewrites item lines to `<li>` tags, opening one container per list kind
/// at its first item and closing only when the final line is an item.
fn render_lists(text: &str) -> String {
    let mut state = ListState::Normal;
    let mut ul_opened = false;
    let mut ol_opened = false;
    let mut out: Vec<String> = Vec::new();

    for line in text.split('\n') {
        if let Some(caps) = UL_ITEM_RE.captures(line) {
            let item = format!("<li>{}</li>", &caps[1]);
            out.push(if ul_opened {
                item
            } else {
                ul_opened = true;
                format!("<ul>{item}")
            });
            state = ListState::Unordered;
        } else if let Some(caps) = OL_ITEM_RE.captures(line) {
            let item = format!("<li>{}</li>", &caps[1]);
            out.push(if ol_opened {
                item
            } else {
                ol_opened = true;
                format!("<ol>{item}")
            });
            state = ListState::Ordered;
        } else {
            // Plain lines interrupt an item run but never close a container.
            out.push(line.to_string());
            state = ListState::Normal;
        }
    }

    let mut html = out.join("\n");
    // A trailing newline produces a final empty segment, which lands the
    // scanner back in Normal, so text ending in "\n" stays unclosed.
    match state {
        ListState::Unordered => html.push_str("</ul>"),
        ListState::Ordered => html.push_str("</ol>"),
        ListState::Normal => {}
    }
    html
}
