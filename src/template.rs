//! Expansion of the [RFC 6570] URI templates the API hands out, e.g.
//! `https://api.github.com/repos/{owner}/{repo}/{archive_format}{/ref}`.
//!
//! Only string values are supported, which covers everything the API
//! advertises. Variables missing from the map are undefined and vanish
//! along with any prefix or separator they would have introduced.
//!
//! [RFC 6570]: https://tools.ietf.org/html/rfc6570

use std::collections::HashMap;
use percent_encoding::{utf8_percent_encode, AsciiSet};

use urls::UNRESERVED;

/// Reserved characters (RFC 3986 gen-delims and sub-delims), which the `+`
/// and `#` operators pass through untouched.
const UNRESERVED_OR_RESERVED: &AsciiSet = &UNRESERVED
    .remove(b':')
    .remove(b'/')
    .remove(b'?')
    .remove(b'#')
    .remove(b'[')
    .remove(b']')
    .remove(b'@')
    .remove(b'!')
    .remove(b'$')
    .remove(b'&')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'+')
    .remove(b',')
    .remove(b';')
    .remove(b'=');

/// Expand `template`, substituting the values in `vars`.
pub fn expand(template: &str, vars: &HashMap<&str, &str>) -> String {
    let mut expanded = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        expanded.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        match after.find('}') {
            Some(end) => {
                expand_expression(&after[..end], vars, &mut expanded);
                rest = &after[end + 1..];
            }
            None => {
                // unterminated, leave it as-is
                expanded.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    expanded.push_str(rest);
    expanded
}

#[derive(Debug, Copy, Clone, PartialEq)]
struct Operator {
    first: &'static str,
    separator: &'static str,
    named: bool,
    if_empty: &'static str,
    allow_reserved: bool,
}

impl Operator {
    fn parse(expression: &str) -> (Operator, &str) {
        let simple = Operator {
            first: "",
            separator: ",",
            named: false,
            if_empty: "",
            allow_reserved: false,
        };

        let op = match expression.chars().next() {
            Some('+') => Operator {
                allow_reserved: true,
                ..simple
            },
            Some('#') => Operator {
                first: "#",
                allow_reserved: true,
                ..simple
            },
            Some('.') => Operator {
                first: ".",
                separator: ".",
                ..simple
            },
            Some('/') => Operator {
                first: "/",
                separator: "/",
                ..simple
            },
            Some(';') => Operator {
                first: ";",
                separator: ";",
                named: true,
                ..simple
            },
            Some('?') => Operator {
                first: "?",
                separator: "&",
                named: true,
                if_empty: "=",
                ..simple
            },
            Some('&') => Operator {
                first: "&",
                separator: "&",
                named: true,
                if_empty: "=",
                ..simple
            },
            _ => return (simple, expression),
        };

        (op, &expression[1..])
    }
}

fn expand_expression(expression: &str, vars: &HashMap<&str, &str>, dest: &mut String) {
    let (op, var_list) = Operator::parse(expression);
    let mut first = true;

    for spec in var_list.split(',') {
        let (name, prefix) = parse_varspec(spec);

        let value = match vars.get(name) {
            Some(value) => *value,
            None => continue,
        };
        let value = match prefix {
            Some(len) => truncate_chars(value, len),
            None => value,
        };

        dest.push_str(if first { op.first } else { op.separator });
        first = false;

        if op.named {
            dest.push_str(name);
            if value.is_empty() {
                dest.push_str(op.if_empty);
                continue;
            }
            dest.push('=');
        }

        encode_value(value, op.allow_reserved, dest);
    }
}

/// Split a varspec into its name and optional `:N` prefix length. An
/// explode modifier has no meaning for string values and is dropped.
fn parse_varspec(spec: &str) -> (&str, Option<usize>) {
    let spec = spec.trim_end_matches('*');

    match spec.find(':') {
        Some(colon) => {
            let prefix = spec[colon + 1..].parse().ok();
            (&spec[..colon], prefix)
        }
        None => (spec, None),
    }
}

fn truncate_chars(value: &str, len: usize) -> &str {
    match value.char_indices().nth(len) {
        Some((ix, _)) => &value[..ix],
        None => value,
    }
}

fn encode_value(value: &str, allow_reserved: bool, dest: &mut String) {
    if !allow_reserved {
        dest.extend(utf8_percent_encode(value, UNRESERVED));
        return;
    }

    // reserved expansion keeps existing pct-encoded triplets intact
    let bytes = value.as_bytes();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        let is_triplet = bytes[i] == b'%' && i + 2 < bytes.len()
            && (bytes[i + 1] as char).is_ascii_hexdigit()
            && (bytes[i + 2] as char).is_ascii_hexdigit();

        if is_triplet {
            dest.extend(utf8_percent_encode(&value[start..i], UNRESERVED_OR_RESERVED));
            dest.push_str(&value[i..i + 3]);
            i += 3;
            start = i;
        } else {
            i += 1;
        }
    }

    dest.extend(utf8_percent_encode(&value[start..], UNRESERVED_OR_RESERVED));
}
