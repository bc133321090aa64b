use std::error::Error;

use serde_json::Value;

// Unaccelerated baseline: parse the interchange payload generically and
// rescan every key's characters instead of using the typed histogram.
pub fn total_magnetization(json_data: &str) -> Result<f64, Box<dyn Error>> {
    let parsed: Value = serde_json::from_str(json_data)?;
    let counts = match &parsed {
        Value::Object(map) if map.contains_key("counts") => map
            .get("counts")
            .and_then(Value::as_object)
            .ok_or("counts must be a JSON object")?,
        Value::Object(map) => map,
        _ => return Err("histogram payload must be a JSON object".into()),
    };

    let mut weighted: i128 = 0;
    let mut total: u128 = 0;
    for (key, value) in counts {
        let count = value
            .as_u64()
            .ok_or_else(|| format!("count for key {key} is not a non-negative integer"))?;
        let mut ones: i128 = 0;
        let mut zeros: i128 = 0;
        for ch in key.chars() {
            match ch {
                '0' => zeros += 1,
                '1' => ones += 1,
                other => return Err(format!("key {key} contains {other}").into()),
            }
        }
        weighted += (ones - zeros) * i128::from(count);
        total += u128::from(count);
    }

    if total == 0 {
        return Ok(0.0);
    }
    Ok(weighted as f64 / total as f64)
}
