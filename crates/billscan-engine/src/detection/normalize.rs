/// Corporate suffixes carry no identity and are dropped during grouping.
const CORPORATE_SUFFIXES: &[&str] = &["ltd", "inc", "corp", "llc", "plc"];

/// Payment-process filler that banks append to merchant strings.
const FILLER_TOKENS: &[&str] = &[
    "payment",
    "autopay",
    "recurring",
    "direct",
    "debit",
    "dd",
    "so",
    "standing",
    "order",
    "ref",
    "memo",
    "description",
];

/// Canonical merchant key used for grouping.
///
/// Two transactions belong to the same merchant iff their normalized forms
/// are byte-identical; there is no fuzzy matching. Digit runs of length two
/// or more are treated as transaction identifiers and removed, a lone digit
/// stays ("3 mobile" keeps its "3").
pub fn normalize_merchant(value: &str) -> Option<String> {
    let mut scrubbed = String::new();
    let mut digit_run = String::new();
    for character in value.trim().chars() {
        if character.is_ascii_digit() {
            digit_run.push(character);
            continue;
        }
        if digit_run.len() == 1 {
            scrubbed.push_str(&digit_run);
        }
        digit_run.clear();

        if character.is_ascii_alphanumeric() {
            scrubbed.push(character.to_ascii_lowercase());
        } else {
            scrubbed.push(' ');
        }
    }
    if digit_run.len() == 1 {
        scrubbed.push_str(&digit_run);
    }

    let mut tokens: Vec<&str> = Vec::new();
    for token in scrubbed.split_whitespace() {
        if CORPORATE_SUFFIXES.contains(&token) || FILLER_TOKENS.contains(&token) {
            continue;
        }
        tokens.push(token);
    }

    if tokens.is_empty() {
        return None;
    }
    Some(tokens.join(" "))
}

/// Lightly-normalized haystack for substring classification.
///
/// Lowercases, maps punctuation to spaces, and collapses whitespace, but
/// keeps digits and filler words so phrases like "direct debit" survive for
/// the payment-method rules.
pub fn classification_haystack(value: &str) -> String {
    let mut output = String::new();
    let mut previous_space = true;
    for character in value.trim().chars() {
        if character.is_ascii_alphanumeric() {
            output.push(character.to_ascii_lowercase());
            previous_space = false;
        } else if !previous_space {
            output.push(' ');
            previous_space = true;
        }
    }
    output.trim_end().to_string()
}

pub fn title_case(value: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    for word in value.split_whitespace() {
        let mut characters = word.chars();
        let titled = match characters.next() {
            Some(first) => first.to_ascii_uppercase().to_string() + characters.as_str(),
            None => String::new(),
        };
        words.push(titled);
    }
    words.join(" ")
}
