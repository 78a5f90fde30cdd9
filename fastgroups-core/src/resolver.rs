use crate::reconcile::InputSlot;
use graph::{ConnectedNodes, ValueSources};
use serde_json::Value;

/// Serialized strings that read as "off". Compared case-insensitively.
const FALSE_STRINGS: [&str; 5] = ["false", "null", "none", "", "0"];

/// Coerces a serialized widget value to a boolean. Values of any other
/// shape carry no signal.
pub fn coerce_serialized_value(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::String(text) => {
            let lowered = text.to_lowercase();
            Some(!FALSE_STRINGS.contains(&lowered.as_str()))
        }
        Value::Number(number) => Some(number.as_f64().map_or(true, |n| n != 0.0)),
        _ => None,
    }
}

/// Reads the boolean driving `slot`, or `None` when nothing determinable
/// is connected. The serialized snapshot is only consulted while a queue
/// submission is in progress.
pub fn resolve_input_value<H>(slot: Option<&InputSlot>, host: &H, in_queue: bool) -> Option<bool>
where
    H: ConnectedNodes + ValueSources + ?Sized,
{
    let link = slot?.link?;
    let upstream = host.resolve_upstream(link);
    let source = *upstream.first()?;

    if let Some(value) = host
        .boolean_source(source)
        .and_then(|capability| capability.read_current_boolean_value())
    {
        return Some(value);
    }

    if !in_queue {
        return None;
    }
    host.serialized_values(source)?
        .first()
        .and_then(coerce_serialized_value)
}
