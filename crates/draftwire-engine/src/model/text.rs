use std::cell::RefCell;
use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use uuid::Uuid;

const KEY_LENGTH: usize = 5;

/// Default block delimiter for plain text: CRLF, CR or LF
pub fn line_break() -> &'static Regex {
    static LINE_BREAK: OnceLock<Regex> = OnceLock::new();
    LINE_BREAK.get_or_init(|| Regex::new(r"\r\n?|\n").expect("Invalid line break regex"))
}

thread_local! {
    static SEEN_KEYS: RefCell<HashSet<String>> = RefCell::new(HashSet::new());
}

/// Short random block key, unique among keys issued on this thread
pub fn generate_random_key() -> String {
    SEEN_KEYS.with(|seen| {
        let mut seen = seen.borrow_mut();
        loop {
            let candidate: String = Uuid::new_v4()
                .simple()
                .to_string()
                .chars()
                .take(KEY_LENGTH)
                .collect();
            if seen.insert(candidate.clone()) {
                return candidate;
            }
        }
    })
}

/// Strip carriage returns, which would otherwise split a block on render
pub fn sanitize_draft_text(input: &str) -> String {
    input.replace('\r', "")
}
