//! Load averages from `/proc/loadavg`.

use hostwatch_types::LoadAverage;

use crate::error::ReadError;

/// Parse the first three fields of `/proc/loadavg`.
pub fn parse_loadavg(content: &str) -> Result<LoadAverage, ReadError> {
    let fields: Vec<&str> = content.split_whitespace().take(3).collect();
    let [one, five, fifteen] = fields[..] else {
        return Err(ReadError::Parse(format!(
            "/proc/loadavg: expected 3 fields in {:?}",
            content.trim()
        )));
    };

    let parse = |raw: &str| {
        raw.parse::<f64>()
            .map_err(|_| ReadError::Parse(format!("/proc/loadavg: bad value {:?}", raw)))
    };

    Ok(LoadAverage {
        one: parse(one)?,
        five: parse(five)?,
        fifteen: parse(fifteen)?,
    })
}
