pub fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter_map(|part| {
            let trimmed = part.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
        .collect()
}

pub fn parse_csv_var(name: &str) -> Option<Vec<String>> {
    std::env::var(name).ok().map(|raw| split_csv(&raw))
}

/// Parse an origin list given either as a JSON array
/// (`["http://a", "http://b"]`) or as comma-separated values.
pub fn parse_origins(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    if trimmed.starts_with('[')
        && let Ok(list) = serde_json::from_str::<Vec<String>>(trimmed)
    {
        return list
            .into_iter()
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();
    }
    split_csv(trimmed)
}

pub fn parse_origins_var(name: &str) -> Option<Vec<String>> {
    std::env::var(name).ok().map(|raw| parse_origins(&raw))
}

/// Parse a boolean value from a raw string, accepting common env-style forms.
///
/// Accepted truthy values (case-insensitive): `"1"`, `"true"`, `"yes"`, `"on"`.
/// Accepted falsy values: `"0"`, `"false"`, `"no"`, `"off"`.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub fn parse_bool_var(name: &str) -> Option<bool> {
    std::env::var(name).ok().and_then(|raw| parse_bool(&raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_drops_blank_entries() {
        assert_eq!(split_csv(" png, ,JPG ,"), vec!["png", "JPG"]);
        assert!(split_csv("").is_empty());
    }

    #[test]
    fn origins_accept_json_and_csv() {
        assert_eq!(
            parse_origins(r#"["http://a.test", " http://b.test "]"#),
            vec!["http://a.test", "http://b.test"]
        );
        assert_eq!(
            parse_origins("http://a.test,http://b.test"),
            vec!["http://a.test", "http://b.test"]
        );
    }

    #[test]
    fn malformed_json_falls_back_to_csv() {
        assert_eq!(parse_origins("[http://a.test"), vec!["[http://a.test"]);
    }

    #[test]
    fn bool_forms() {
        assert_eq!(parse_bool("Yes"), Some(true));
        assert_eq!(parse_bool(" off "), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
