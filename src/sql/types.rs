//! Column data types offered when creating or editing columns.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DataTypeOption {
    pub label: &'static str,
    pub value: &'static str,
    pub description: &'static str,
}

const fn opt(label: &'static str, value: &'static str, description: &'static str) -> DataTypeOption {
    DataTypeOption {
        label,
        value,
        description,
    }
}

pub const DATA_TYPES: &[DataTypeOption] = &[
    opt("Text", "text", "Variable unlimited length"),
    opt("Varchar", "character varying", "Variable length with limit"),
    opt("Integer", "integer", "4 bytes, -2147483648 to +2147483647"),
    opt("Bigint", "bigint", "8 bytes, -9223372036854775808 to 9223372036854775807"),
    opt("Boolean", "boolean", "true/false"),
    opt("UUID", "uuid", "Universally unique identifier"),
    opt("JSON", "json", "Textual JSON data"),
    opt("JSONB", "jsonb", "Binary JSON data, decomposed"),
    opt("Date", "date", "Calendar date (year, month, day)"),
    opt("Time", "time", "Time of day (no time zone)"),
    opt("Timestamp", "timestamp without time zone", "Date and time (no time zone)"),
    opt("Timestamp with time zone", "timestamp with time zone", "Date and time, including time zone"),
    opt("Double precision", "double precision", "8-byte floating-point number"),
    opt("Real", "real", "4-byte floating-point number"),
];

/// Split a type name into its lowercased base and its modifier.
///
/// The modifier may sit anywhere in the name: `timestamp(3) with time zone`
/// gives `("timestamp with time zone", Some("(3)"))`.
pub fn split_modifier(name: &str) -> (String, Option<String>) {
    let lower = name.trim().to_lowercase();
    let squash = |s: &str| s.split_whitespace().collect::<Vec<_>>().join(" ");

    match (lower.find('('), lower.find(')')) {
        (Some(start), Some(end)) if end > start => {
            let base = format!("{} {}", &lower[..start], &lower[end + 1..]);
            let modifier: String = lower[start..=end].chars().filter(|c| !c.is_whitespace()).collect();
            (squash(&base), Some(modifier))
        }
        _ => (squash(&lower), None),
    }
}

/// Find the catalog entry for a type name, accepting common PostgreSQL aliases.
///
/// A modifier is kept out of the lookup: `varchar(255)` resolves to
/// `character varying`, `timestamptz(3)` to `timestamp with time zone`.
pub fn resolve_data_type(name: &str) -> Option<&'static DataTypeOption> {
    let (base, _) = split_modifier(name);

    let canonical = match base.as_str() {
        "text" => "text",
        "varchar" | "character varying" => "character varying",
        "int" | "int4" | "integer" => "integer",
        "bigint" | "int8" => "bigint",
        "bool" | "boolean" => "boolean",
        "uuid" => "uuid",
        "json" => "json",
        "jsonb" => "jsonb",
        "date" => "date",
        "time" | "time without time zone" => "time",
        "timestamp" | "timestamp without time zone" => "timestamp without time zone",
        "timestamptz" | "timestamp with time zone" => "timestamp with time zone",
        "float8" | "double precision" => "double precision",
        "float4" | "real" => "real",
        _ => return None,
    };

    DATA_TYPES.iter().find(|t| t.value == canonical)
}

/// Spell `data_type` with `modifier` where PostgreSQL expects it.
///
/// Lengths follow `character varying`; precisions follow the leading `time` or
/// `timestamp` keyword. Other types take no modifier and give `None`, as does
/// a modifier that is not a parenthesized number.
pub fn with_modifier(data_type: &DataTypeOption, modifier: &str) -> Option<String> {
    let digits = modifier.strip_prefix('(')?.strip_suffix(')')?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    match data_type.value {
        "character varying" => Some(format!("{}{}", data_type.value, modifier)),
        "time" | "timestamp without time zone" | "timestamp with time zone" => {
            let (head, tail) = data_type
                .value
                .split_once(' ')
                .map_or((data_type.value, String::new()), |(h, t)| (h, format!(" {}", t)));
            Some(format!("{}{}{}", head, modifier, tail))
        }
        _ => None,
    }
}
