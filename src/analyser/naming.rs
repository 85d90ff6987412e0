use std::collections::HashSet;

/// Turns a column name into a token safe to use inside a file name.
///
/// Anything other than ASCII letters, digits, `-` and `_` becomes `_`, runs
/// of `_` collapse to one, and the result never starts or ends with `_`.
pub fn file_token(name: &str) -> String {
    let mut token = String::with_capacity(name.len());
    let mut last_was_underscore = false;

    for c in name.trim().chars() {
        let c = if c.is_ascii_alphanumeric() || c == '-' {
            c
        } else {
            '_'
        };
        if c == '_' {
            if !last_was_underscore {
                token.push(c);
            }
            last_was_underscore = true;
        } else {
            token.push(c);
            last_was_underscore = false;
        }
    }

    let token = token.trim_matches('_');
    if token.is_empty() {
        "column".to_owned()
    } else {
        token.to_owned()
    }
}

/// Sanitised tokens for several names; later duplicates get `_1`, `_2`, ...
pub fn unique_file_tokens<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut tokens = Vec::with_capacity(names.len());

    for name in names {
        let base = file_token(name.as_ref());
        let mut token = base.clone();
        let mut suffix = 0;
        while seen.contains(&token) {
            suffix += 1;
            token = format!("{base}_{suffix}");
        }
        seen.insert(token.clone());
        tokens.push(token);
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_token_replaces_separators() {
        assert_eq!(file_token("Total Sales ($)"), "Total_Sales");
        assert_eq!(file_token("a/b\\c"), "a_b_c");
        assert_eq!(file_token("  region-code "), "region-code");
    }

    #[test]
    fn test_file_token_never_empty() {
        assert_eq!(file_token("%%%"), "column");
        assert_eq!(file_token(""), "column");
    }

    #[test]
    fn test_unique_file_tokens_deduplicates() {
        let tokens = unique_file_tokens(&["a b", "a/b", "a_b", "c"]);
        assert_eq!(tokens, vec!["a_b", "a_b_1", "a_b_2", "c"]);
    }
}
