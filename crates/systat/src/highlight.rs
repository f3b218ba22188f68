//! Terminal syntax highlighting for YAML and JSON output.
//!
//! Both highlighters only wrap tokens in ANSI escapes; removing the
//! escapes gives back the input byte for byte.

use owo_colors::OwoColorize;

// ── JSON ─────────────────────────────────────────────────────────────

/// Highlight a JSON document. Object keys, strings, numbers, literals
/// (`true`, `false`, `null`) and punctuation each get their own color.
pub fn json(input: &str) -> String {
    let mut out = String::with_capacity(input.len() * 2);
    let chars: Vec<char> = input.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '"' => {
                let end = string_end(&chars, i);
                let token: String = chars[i..end].iter().collect();
                if next_non_space(&chars, end) == Some(':') {
                    out.push_str(&token.cyan().bold().to_string());
                } else {
                    out.push_str(&token.green().to_string());
                }
                i = end;
            }
            '{' | '}' | '[' | ']' | ':' | ',' => {
                out.push_str(&c.bright_black().to_string());
                i += 1;
            }
            '-' | '0'..='9' => {
                let end = scan_while(&chars, i, |c| {
                    c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E')
                });
                let token: String = chars[i..end].iter().collect();
                out.push_str(&token.yellow().to_string());
                i = end;
            }
            c if c.is_ascii_alphabetic() => {
                let end = scan_while(&chars, i, |c| c.is_ascii_alphabetic());
                let token: String = chars[i..end].iter().collect();
                out.push_str(&token.magenta().to_string());
                i = end;
            }
            other => {
                out.push(other);
                i += 1;
            }
        }
    }
    out
}

/// Index one past the closing quote of the string starting at `start`.
fn string_end(chars: &[char], start: usize) -> usize {
    let mut i = start + 1;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            '"' => return i + 1,
            _ => i += 1,
        }
    }
    chars.len()
}

fn scan_while(chars: &[char], start: usize, pred: impl Fn(char) -> bool) -> usize {
    let mut i = start + 1;
    while i < chars.len() && pred(chars[i]) {
        i += 1;
    }
    i
}

fn next_non_space(chars: &[char], from: usize) -> Option<char> {
    chars[from.min(chars.len())..]
        .iter()
        .copied()
        .find(|c| !c.is_whitespace())
}

// ── YAML ─────────────────────────────────────────────────────────────

/// Highlight the block-style YAML `serde_yaml` emits, line by line.
pub fn yaml(input: &str) -> String {
    let mut out = String::with_capacity(input.len() * 2);
    for line in input.split_inclusive('\n') {
        let (body, newline) = match line.strip_suffix('\n') {
            Some(body) => (body, "\n"),
            None => (line, ""),
        };
        yaml_line(body, &mut out);
        out.push_str(newline);
    }
    out
}

fn yaml_line(line: &str, out: &mut String) {
    let trimmed = line.trim_start();
    let (indent, mut rest) = line.split_at(line.len() - trimmed.len());
    out.push_str(indent);

    if rest.starts_with('#') || rest == "---" {
        out.push_str(&rest.bright_black().to_string());
        return;
    }

    while let Some(after) = rest.strip_prefix("- ") {
        out.push_str(&"-".bright_black().to_string());
        out.push(' ');
        rest = after;
    }
    if rest == "-" {
        out.push_str(&"-".bright_black().to_string());
        return;
    }

    match split_key(rest) {
        Some((key, value)) => {
            out.push_str(&key.cyan().bold().to_string());
            out.push_str(&":".bright_black().to_string());
            if let Some(value) = value.strip_prefix(' ') {
                out.push(' ');
                out.push_str(&yaml_scalar(value));
            } else {
                out.push_str(value);
            }
        }
        None => out.push_str(&yaml_scalar(rest)),
    }
}

/// Split `key: value` (or a bare `key:`) at the first unquoted `: `.
fn split_key(s: &str) -> Option<(&str, &str)> {
    if s.starts_with('"') || s.starts_with('\'') {
        let quote = s.chars().next()?;
        let close = s[1..].find(quote)? + 1;
        let after = &s[close + 1..];
        return after
            .strip_prefix(':')
            .filter(|v| v.is_empty() || v.starts_with(' '))
            .map(|v| (&s[..=close], v));
    }

    if let Some(key) = s.strip_suffix(':') {
        if !key.contains(": ") {
            return Some((key, ""));
        }
    }
    let idx = s.find(": ")?;
    Some((&s[..idx], &s[idx + 1..]))
}

fn yaml_scalar(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    match value {
        "true" | "false" | "null" | "~" => value.magenta().to_string(),
        "[]" | "{}" | "|" | "|-" | ">" | ">-" => value.bright_black().to_string(),
        v if v.parse::<f64>().is_ok() => v.yellow().to_string(),
        v => v.green().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    /// Remove `ESC [ ... m` sequences.
    fn strip_ansi(s: &str) -> String {
        let mut out = String::with_capacity(s.len());
        let mut chars = s.chars();
        while let Some(c) = chars.next() {
            if c == '\u{1b}' {
                for c in chars.by_ref() {
                    if c == 'm' {
                        break;
                    }
                }
            } else {
                out.push(c);
            }
        }
        out
    }

    const JSON_DOC: &str = r#"{
  "host": "box \"one\"",
  "cores": 4,
  "load": -0.5e1,
  "up": true,
  "swap": null,
  "tags": ["a", "b"]
}"#;

    const YAML_DOC: &str = "\
host: box
cores: 4
up: true
swap: null
partitions:
- device: /dev/sda1
  mount_point: /
  used_percent: 41.5
- device: 'tmpfs: scratch'
empty: []
note: 'a: b'
";

    #[test]
    fn json_round_trips_through_strip() {
        let colored = json(JSON_DOC);
        assert!(colored.contains('\u{1b}'));
        assert_eq!(strip_ansi(&colored), JSON_DOC);
    }

    #[test]
    fn yaml_round_trips_through_strip() {
        let colored = yaml(YAML_DOC);
        assert!(colored.contains('\u{1b}'));
        assert_eq!(strip_ansi(&colored), YAML_DOC);
    }

    #[test]
    fn json_keys_and_values_differ() {
        let colored = json(r#"{"a": "a"}"#);
        let key = "\"a\"".cyan().bold().to_string();
        let value = "\"a\"".green().to_string();
        assert!(colored.contains(&key));
        assert!(colored.contains(&value));
    }

    #[test]
    fn yaml_scalars_are_classified() {
        assert_eq!(yaml_scalar("true"), "true".magenta().to_string());
        assert_eq!(yaml_scalar("12.5"), "12.5".yellow().to_string());
        assert_eq!(yaml_scalar("/dev/sda"), "/dev/sda".green().to_string());
    }

    #[test]
    fn key_split_ignores_colons_inside_values() {
        assert_eq!(split_key("note: 'a: b'"), Some(("note", " 'a: b'")));
        assert_eq!(split_key("partitions:"), Some(("partitions", "")));
        assert_eq!(split_key("'k: x': 1"), Some(("'k: x'", " 1")));
        assert_eq!(split_key("plain"), None);
    }
}
