//! Request payload validation.
//!
//! Each payload shape is described by a static table of [`Field`]s which a
//! single interpreter walks. Validation never stops at the first problem: all
//! messages are collected and reported together.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::error::{CallWhizError, Result};

const PHONE_PATTERN: &str = r"^\+?[1-9]\d{1,14}$";

/// Payload shapes known to the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    AgentCreate,
    AgentUpdate,
    CallCreate,
    WebhookCreate,
    WebhookUpdate,
    ApiKeyCreate,
}

#[derive(Debug, Clone, Copy)]
enum Kind {
    Str { min: usize, max: Option<usize> },
    Number,
    Integer,
    Boolean,
    AnyObject,
    Object(&'static [Field]),
    StringArray { min_items: usize },
    Phone,
    Url,
}

#[derive(Debug, Clone, Copy)]
enum Fallback {
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Fallback {
    fn to_value(self) -> Value {
        match self {
            Fallback::Int(v) => Value::from(v),
            Fallback::Float(v) => Value::from(v),
            Fallback::Bool(v) => Value::Bool(v),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Field {
    name: &'static str,
    kind: Kind,
    required: bool,
    default: Option<Fallback>,
}

impl Field {
    const fn new(name: &'static str, kind: Kind) -> Self {
        Self {
            name,
            kind,
            required: false,
            default: None,
        }
    }

    const fn string(name: &'static str) -> Self {
        Self::new(name, Kind::Str { min: 0, max: None })
    }

    const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    const fn or(mut self, fallback: Fallback) -> Self {
        self.default = Some(fallback);
        self
    }
}

struct Schema {
    fields: &'static [Field],
    min_keys: usize,
}

const VOICE_CREATE: &[Field] = &[
    Field::string("provider").required(),
    Field::string("voice_id").required(),
    Field::new("speed", Kind::Number).or(Fallback::Int(1)),
    Field::new("pitch", Kind::Number).or(Fallback::Int(1)),
];

const LLM_CREATE: &[Field] = &[
    Field::string("provider").required(),
    Field::string("model").required(),
    Field::new("temperature", Kind::Number).or(Fallback::Float(0.7)),
    Field::new("max_tokens", Kind::Integer).or(Fallback::Int(150)),
];

const SETTINGS_CREATE: &[Field] = &[
    Field::new("max_call_duration", Kind::Integer).or(Fallback::Int(1800)),
    Field::new("enable_interruptions", Kind::Boolean).or(Fallback::Bool(true)),
    Field::new("silence_timeout", Kind::Number).or(Fallback::Int(5)),
    Field::new("response_delay", Kind::Number).or(Fallback::Float(0.5)),
];

const VOICE_UPDATE: &[Field] = &[
    Field::string("provider"),
    Field::string("voice_id"),
    Field::new("speed", Kind::Number),
    Field::new("pitch", Kind::Number),
];

const LLM_UPDATE: &[Field] = &[
    Field::string("provider"),
    Field::string("model"),
    Field::new("temperature", Kind::Number),
    Field::new("max_tokens", Kind::Integer),
];

const SETTINGS_UPDATE: &[Field] = &[
    Field::new("max_call_duration", Kind::Integer),
    Field::new("enable_interruptions", Kind::Boolean),
    Field::new("silence_timeout", Kind::Number),
    Field::new("response_delay", Kind::Number),
];

const AGENT_CREATE: &[Field] = &[
    Field::string("name").required(),
    Field::string("description"),
    Field::new("voice", Kind::Object(VOICE_CREATE)).required(),
    Field::new("llm", Kind::Object(LLM_CREATE)).required(),
    Field::string("prompt").required(),
    Field::string("first_message"),
    Field::new("settings", Kind::Object(SETTINGS_CREATE)),
    Field::new("metadata", Kind::AnyObject),
];

const AGENT_UPDATE: &[Field] = &[
    Field::string("name"),
    Field::string("description"),
    Field::new("voice", Kind::Object(VOICE_UPDATE)),
    Field::new("llm", Kind::Object(LLM_UPDATE)),
    Field::string("prompt"),
    Field::string("first_message"),
    Field::new("settings", Kind::Object(SETTINGS_UPDATE)),
    Field::string("status"),
    Field::new("metadata", Kind::AnyObject),
];

const CALL_CREATE: &[Field] = &[
    Field::string("agent_id").required(),
    Field::new("phone_number", Kind::Phone).required(),
    Field::string("context"),
    Field::new("webhook_url", Kind::Url),
    Field::new("metadata", Kind::AnyObject),
];

const RETRY_POLICY: &[Field] = &[
    Field::new("max_retries", Kind::Integer),
    Field::new("retry_delay", Kind::Number),
    Field::new("backoff_multiplier", Kind::Number),
];

const WEBHOOK_CREATE: &[Field] = &[
    Field::new("url", Kind::Url).required(),
    Field::new("events", Kind::StringArray { min_items: 1 }).required(),
    Field::string("description"),
    Field::new("agent_ids", Kind::StringArray { min_items: 0 }),
    Field::new("active", Kind::Boolean).or(Fallback::Bool(true)),
    Field::new("retry_policy", Kind::Object(RETRY_POLICY)),
    Field::new("headers", Kind::AnyObject),
    Field::new("metadata", Kind::AnyObject),
];

const WEBHOOK_UPDATE: &[Field] = &[
    Field::new("url", Kind::Url),
    Field::new("events", Kind::StringArray { min_items: 1 }),
    Field::string("description"),
    Field::new("agent_ids", Kind::StringArray { min_items: 0 }),
    Field::new("active", Kind::Boolean),
    Field::new("retry_policy", Kind::Object(RETRY_POLICY)),
    Field::new("headers", Kind::AnyObject),
    Field::new("metadata", Kind::AnyObject),
];

const API_KEY_CREATE: &[Field] = &[
    Field::new(
        "name",
        Kind::Str {
            min: 1,
            max: Some(100),
        },
    )
    .required(),
    Field::string("description"),
    Field::new("permissions", Kind::StringArray { min_items: 0 }),
];

impl SchemaKind {
    fn schema(self) -> Schema {
        let (fields, min_keys) = match self {
            SchemaKind::AgentCreate => (AGENT_CREATE, 0),
            SchemaKind::AgentUpdate => (AGENT_UPDATE, 1),
            SchemaKind::CallCreate => (CALL_CREATE, 0),
            SchemaKind::WebhookCreate => (WEBHOOK_CREATE, 0),
            SchemaKind::WebhookUpdate => (WEBHOOK_UPDATE, 1),
            SchemaKind::ApiKeyCreate => (API_KEY_CREATE, 0),
        };
        Schema { fields, min_keys }
    }
}

fn phone_regex() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE.get_or_init(|| Regex::new(PHONE_PATTERN).expect("valid regex"))
}

/// Validates `input` against the schema for `kind` and returns it with
/// defaults filled in.
pub fn validate(kind: SchemaKind, input: &Value) -> Result<Value> {
    let schema = kind.schema();
    let mut errors = Vec::new();

    let normalized = match input.as_object() {
        Some(object) => {
            if object.len() < schema.min_keys {
                let plural = if schema.min_keys == 1 { "" } else { "s" };
                errors.push(format!(
                    "\"value\" must have at least {} key{plural}",
                    schema.min_keys
                ));
            }
            check_object(schema.fields, object, "", &mut errors)
        }
        None => {
            errors.push("\"value\" must be of type object".to_string());
            Value::Null
        }
    };

    if errors.is_empty() {
        Ok(normalized)
    } else {
        Err(CallWhizError::validation(format!(
            "Validation failed: {}",
            errors.join(", ")
        )))
    }
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

fn check_object(
    fields: &[Field],
    object: &Map<String, Value>,
    prefix: &str,
    errors: &mut Vec<String>,
) -> Value {
    let mut normalized = Map::new();

    for field in fields {
        let path = join_path(prefix, field.name);
        match object.get(field.name) {
            Some(value) => {
                let checked = check_value(field.kind, value, &path, errors);
                normalized.insert(field.name.to_string(), checked);
            }
            None if field.required => errors.push(format!("\"{path}\" is required")),
            None => {
                if let Some(fallback) = field.default {
                    normalized.insert(field.name.to_string(), fallback.to_value());
                }
            }
        }
    }

    for key in object.keys() {
        if !fields.iter().any(|f| f.name == key) {
            errors.push(format!("\"{}\" is not allowed", join_path(prefix, key)));
        }
    }

    Value::Object(normalized)
}

fn check_string<'a>(value: &'a Value, path: &str, errors: &mut Vec<String>) -> Option<&'a str> {
    match value.as_str() {
        Some("") => {
            errors.push(format!("\"{path}\" is not allowed to be empty"));
            None
        }
        Some(s) => Some(s),
        None => {
            errors.push(format!("\"{path}\" must be a string"));
            None
        }
    }
}

fn is_integer(value: &Value) -> bool {
    value.is_i64() || value.is_u64() || value.as_f64().is_some_and(|f| f.fract() == 0.0)
}

fn check_value(kind: Kind, value: &Value, path: &str, errors: &mut Vec<String>) -> Value {
    match kind {
        Kind::Str { min, max } => {
            if let Some(s) = check_string(value, path, errors) {
                let len = s.chars().count();
                if len < min {
                    errors.push(format!(
                        "\"{path}\" length must be at least {min} characters long"
                    ));
                }
                if let Some(max) = max.filter(|max| len > *max) {
                    errors.push(format!(
                        "\"{path}\" length must be less than or equal to {max} characters long"
                    ));
                }
            }
        }
        Kind::Number => {
            if !value.is_number() {
                errors.push(format!("\"{path}\" must be a number"));
            }
        }
        Kind::Integer => {
            if !value.is_number() {
                errors.push(format!("\"{path}\" must be a number"));
            } else if !is_integer(value) {
                errors.push(format!("\"{path}\" must be an integer"));
            }
        }
        Kind::Boolean => {
            if !value.is_boolean() {
                errors.push(format!("\"{path}\" must be a boolean"));
            }
        }
        Kind::AnyObject => {
            if !value.is_object() {
                errors.push(format!("\"{path}\" must be of type object"));
            }
        }
        Kind::Object(fields) => match value.as_object() {
            Some(object) => return check_object(fields, object, path, errors),
            None => errors.push(format!("\"{path}\" must be of type object")),
        },
        Kind::StringArray { min_items } => match value.as_array() {
            Some(items) => {
                for (i, item) in items.iter().enumerate() {
                    check_string(item, &format!("{path}[{i}]"), errors);
                }
                if items.len() < min_items {
                    errors.push(format!(
                        "\"{path}\" must contain at least {min_items} items"
                    ));
                }
            }
            None => errors.push(format!("\"{path}\" must be an array")),
        },
        Kind::Phone => {
            if let Some(s) = check_string(value, path, errors) {
                if !phone_regex().is_match(s) {
                    errors.push(format!(
                        "\"{path}\" with value \"{s}\" fails to match the required pattern: /{PHONE_PATTERN}/"
                    ));
                }
            }
        }
        Kind::Url => {
            if let Some(s) = check_string(value, path, errors) {
                let allowed = url::Url::parse(s)
                    .map(|u| matches!(u.scheme(), "http" | "https"))
                    .unwrap_or(false);
                if !allowed {
                    errors.push(format!(
                        "\"{path}\" must be a valid uri with a scheme matching the http|https pattern"
                    ));
                }
            }
        }
    }

    value.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn agent() -> Value {
        json!({
            "name": "Support",
            "voice": {"provider": "openai", "voice_id": "alloy"},
            "llm": {"provider": "openai", "model": "gpt-4"},
            "prompt": "You are helpful."
        })
    }

    fn message(result: Result<Value>) -> String {
        result.unwrap_err().message().to_string()
    }

    #[test]
    fn agent_create_fills_nested_defaults() {
        let mut input = agent();
        input["settings"] = json!({});
        let out = validate(SchemaKind::AgentCreate, &input).unwrap();

        assert_eq!(out["voice"]["speed"], json!(1));
        assert_eq!(out["voice"]["pitch"], json!(1));
        assert_eq!(out["llm"]["temperature"], json!(0.7));
        assert_eq!(out["llm"]["max_tokens"], json!(150));
        assert_eq!(out["settings"]["max_call_duration"], json!(1800));
        assert_eq!(out["settings"]["enable_interruptions"], json!(true));
        assert_eq!(out["settings"]["silence_timeout"], json!(5));
        assert_eq!(out["settings"]["response_delay"], json!(0.5));
    }

    #[test]
    fn absent_optional_objects_get_no_defaults() {
        let out = validate(SchemaKind::AgentCreate, &agent()).unwrap();
        assert!(out.get("settings").is_none());
    }

    #[test]
    fn provided_values_win_over_defaults() {
        let mut input = agent();
        input["voice"]["speed"] = json!(1.25);
        let out = validate(SchemaKind::AgentCreate, &input).unwrap();
        assert_eq!(out["voice"]["speed"], json!(1.25));
    }

    #[test]
    fn agent_create_without_voice_fails() {
        let mut input = agent();
        input.as_object_mut().unwrap().remove("voice");
        let msg = message(validate(SchemaKind::AgentCreate, &input));
        assert_eq!(msg, "Validation failed: \"voice\" is required");
    }

    #[test]
    fn errors_are_collected_not_short_circuited() {
        let input = json!({
            "name": "",
            "voice": {"provider": "openai", "speed": "fast"},
            "llm": {"provider": "openai", "model": "gpt-4", "max_tokens": 1.5}
        });
        let msg = message(validate(SchemaKind::AgentCreate, &input));
        assert!(msg.starts_with("Validation failed: "));
        assert!(msg.contains("\"name\" is not allowed to be empty"));
        assert!(msg.contains("\"voice.voice_id\" is required"));
        assert!(msg.contains("\"voice.speed\" must be a number"));
        assert!(msg.contains("\"llm.max_tokens\" must be an integer"));
        assert!(msg.contains("\"prompt\" is required"));
        assert_eq!(msg.matches(", ").count(), 4);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let mut input = agent();
        input["colour"] = json!("blue");
        input["voice"]["accent"] = json!("scottish");
        let msg = message(validate(SchemaKind::AgentCreate, &input));
        assert!(msg.contains("\"colour\" is not allowed"));
        assert!(msg.contains("\"voice.accent\" is not allowed"));
    }

    #[test]
    fn empty_updates_fail() {
        for kind in [SchemaKind::AgentUpdate, SchemaKind::WebhookUpdate] {
            let msg = message(validate(kind, &json!({})));
            assert_eq!(msg, "Validation failed: \"value\" must have at least 1 key");
        }
    }

    #[test]
    fn partial_update_passes_without_defaults() {
        let out = validate(SchemaKind::AgentUpdate, &json!({"voice": {"speed": 1.1}})).unwrap();
        assert_eq!(out, json!({"voice": {"speed": 1.1}}));
    }

    #[test]
    fn non_object_payload_fails() {
        let msg = message(validate(SchemaKind::CallCreate, &json!(["a"])));
        assert_eq!(msg, "Validation failed: \"value\" must be of type object");
    }

    #[test]
    fn phone_numbers() {
        let call = |phone: &str| {
            validate(
                SchemaKind::CallCreate,
                &json!({"agent_id": "a1", "phone_number": phone}),
            )
        };
        assert!(call("+1234567890").is_ok());
        assert!(call("1234567890").is_ok());
        assert!(call("+123456789012345").is_ok());
        assert!(call("0123456789").is_err());
        assert!(call("123").is_ok());
        assert!(call("1").is_err());
        assert!(call("+1234567890123456").is_err());
        assert!(call("+1 234 567").is_err());

        let msg = message(call("0123456789"));
        assert_eq!(
            msg,
            "Validation failed: \"phone_number\" with value \"0123456789\" fails to match the required pattern: /^\\+?[1-9]\\d{1,14}$/"
        );
    }

    #[test]
    fn webhook_urls() {
        let hook = |url: &str| {
            validate(
                SchemaKind::WebhookCreate,
                &json!({"url": url, "events": ["call.completed"]}),
            )
        };
        assert!(hook("https://example.com/hook").is_ok());
        assert!(hook("http://localhost:3000/cb").is_ok());
        assert!(hook("not a url").is_err());
        let msg = message(hook("ftp://example.com"));
        assert_eq!(
            msg,
            "Validation failed: \"url\" must be a valid uri with a scheme matching the http|https pattern"
        );
    }

    #[test]
    fn webhook_create_defaults_active() {
        let out = validate(
            SchemaKind::WebhookCreate,
            &json!({"url": "https://example.com/hook", "events": ["call.started"]}),
        )
        .unwrap();
        assert_eq!(out["active"], json!(true));
    }

    #[test]
    fn webhook_events_must_be_non_empty_strings() {
        let msg = message(validate(
            SchemaKind::WebhookCreate,
            &json!({"url": "https://example.com/hook", "events": []}),
        ));
        assert!(msg.contains("\"events\" must contain at least 1 items"));

        let msg = message(validate(
            SchemaKind::WebhookUpdate,
            &json!({"events": ["call.started", 7]}),
        ));
        assert!(msg.contains("\"events[1]\" must be a string"));
    }

    #[test]
    fn api_key_name_length() {
        let long = "k".repeat(101);
        let msg = message(validate(SchemaKind::ApiKeyCreate, &json!({"name": long})));
        assert!(msg.contains("\"name\" length must be less than or equal to 100 characters long"));
        assert!(validate(SchemaKind::ApiKeyCreate, &json!({"name": "k".repeat(100)})).is_ok());
        assert!(validate(SchemaKind::ApiKeyCreate, &json!({"name": ""})).is_err());
    }

    #[test]
    fn validation_error_kind() {
        let err = validate(SchemaKind::ApiKeyCreate, &json!({})).unwrap_err();
        assert!(matches!(err, CallWhizError::Validation { status: 400, .. }));
    }
}
