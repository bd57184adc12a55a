use ftl_i18n_core::{Args, Value};

/// Builds message arguments from a JSON object. Strings and numbers become FTL
/// values; other kinds are kept but render as their variable name.
pub fn args_from_json(json: &serde_json::Value) -> Args {
    let mut args = Args::new();
    let Some(object) = json.as_object() else {
        return args;
    };
    for (name, value) in object {
        let value = match value {
            serde_json::Value::String(text) => Value::Str(text.clone()),
            serde_json::Value::Number(number) => match number.as_f64() {
                Some(number) => Value::Num(number),
                None => Value::Any(Box::new(number.clone())),
            },
            serde_json::Value::Bool(flag) => Value::Bool(*flag),
            other => Value::Any(Box::new(other.clone())),
        };
        args.insert(name.as_str(), value);
    }
    args
}
