//! Row decoding for StarRocks result sets.
//!
//! Statements run over the MySQL text protocol, so every non-binary value
//! arrives as text. Conversion happens in two phases:
//! 1. `TypeCategory` classifies the column type reported by the server
//! 2. the column text is converted to JSON according to that category
//!
//! Binary columns are read as raw bytes instead.

use crate::models::Row;
use serde_json::Value as JsonValue;
use sqlx::mysql::{MySqlColumn, MySqlRow, MySqlTypeInfo, MySqlValueRef};
use sqlx::{Column, Decode, Row as _, Type, TypeInfo, ValueRef};

/// Logical category for column types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCategory {
    Integer,
    Float,
    Decimal,
    Text,
    Binary,
    Json,
}

/// Classify a column type name into a logical category.
pub fn categorize_type(type_name: &str) -> TypeCategory {
    let lower = type_name.to_lowercase();

    // DECIMALV2, DECIMAL32/64/128
    if lower.contains("decimal") || lower.contains("numeric") {
        return TypeCategory::Decimal;
    }

    // sqlx reports TINYINT(1), and so StarRocks BOOLEAN, as "BOOLEAN"; the
    // wire value is 0 or 1
    if lower == "bool" || lower == "boolean" {
        return TypeCategory::Integer;
    }

    if lower.contains("int") {
        return TypeCategory::Integer;
    }

    if lower.contains("float") || lower.contains("double") || lower == "real" {
        return TypeCategory::Float;
    }

    if lower == "json" || lower == "jsonb" {
        return TypeCategory::Json;
    }

    if lower.contains("blob") || lower.contains("binary") {
        return TypeCategory::Binary;
    }

    // varchar, char, string, date, datetime, array, map, struct, ...
    TypeCategory::Text
}

/// Column text exactly as the server sent it, regardless of declared type.
#[derive(Debug)]
pub struct RawText(pub String);

impl Type<sqlx::MySql> for RawText {
    fn type_info() -> MySqlTypeInfo {
        <String as Type<sqlx::MySql>>::type_info()
    }

    fn compatible(_ty: &MySqlTypeInfo) -> bool {
        true
    }
}

impl<'r> Decode<'r, sqlx::MySql> for RawText {
    fn decode(value: MySqlValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as Decode<sqlx::MySql>>::decode(value)?;
        Ok(RawText(s.to_string()))
    }
}

/// Convert binary data to JSON: UTF-8 text when valid, base64 otherwise.
pub fn decode_binary_value(bytes: &[u8]) -> JsonValue {
    use base64::{Engine as _, engine::general_purpose::STANDARD};

    match std::str::from_utf8(bytes) {
        Ok(s) => JsonValue::String(s.to_string()),
        Err(_) => JsonValue::String(STANDARD.encode(bytes)),
    }
}

/// Convert one column's text to JSON according to its category.
///
/// Numbers that do not fit a JSON number keep their text form, so LARGEINT
/// and DECIMAL values never lose precision.
pub fn decode_text_value(text: String, category: TypeCategory) -> JsonValue {
    match category {
        TypeCategory::Integer => {
            if let Ok(v) = text.parse::<i64>() {
                return JsonValue::Number(v.into());
            }
            if let Ok(v) = text.parse::<u64>() {
                return JsonValue::Number(v.into());
            }
            JsonValue::String(text)
        }
        TypeCategory::Float => text
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::String(text)),
        TypeCategory::Json => serde_json::from_str(&text).unwrap_or(JsonValue::String(text)),
        TypeCategory::Decimal | TypeCategory::Text | TypeCategory::Binary => {
            JsonValue::String(text)
        }
    }
}

fn decode_column(row: &MySqlRow, idx: usize, category: TypeCategory) -> JsonValue {
    match row.try_get_raw(idx) {
        Ok(value) if value.is_null() => return JsonValue::Null,
        Ok(_) => {}
        Err(e) => {
            tracing::error!(column = idx, error = %e, "Failed to read column");
            return JsonValue::Null;
        }
    }

    if category == TypeCategory::Binary {
        return match row.try_get_unchecked::<Vec<u8>, _>(idx) {
            Ok(bytes) => decode_binary_value(&bytes),
            Err(e) => {
                tracing::error!(column = idx, error = %e, "Failed to decode binary column");
                JsonValue::Null
            }
        };
    }

    match row.try_get::<RawText, _>(idx) {
        Ok(RawText(text)) => decode_text_value(text, category),
        Err(e) => {
            tracing::error!(column = idx, error = %e, "Failed to decode column");
            JsonValue::Null
        }
    }
}

/// Names of result columns, in order.
pub fn column_names(columns: &[MySqlColumn]) -> Vec<String> {
    columns.iter().map(|col| col.name().to_string()).collect()
}

/// Convert a result row into a JSON map keyed by column name.
pub fn row_to_json(row: &MySqlRow) -> Row {
    row.columns()
        .iter()
        .enumerate()
        .map(|(idx, col)| {
            let category = categorize_type(col.type_info().name());
            (col.name().to_string(), decode_column(row, idx, category))
        })
        .collect()
}
