use rust_embed::Embed;

use crate::drill::DrillSet;
use crate::drill::mapper::map_payload;
use crate::drill::payload::DrillPayload;

#[derive(Embed)]
#[folder = "assets/samples/"]
struct SampleAssets;

pub const SAMPLE_FILE: &str = "daily-routine.json";
pub const SAMPLE_NAME: &str = "Sample Drills";

/// The bundled sample, stored in the same shape the model is asked for and
/// mapped the same way a generated reply is.
pub fn load_sample() -> Option<DrillSet> {
    let file = SampleAssets::get(SAMPLE_FILE)?;
    let content = std::str::from_utf8(file.data.as_ref()).ok()?;
    let value: serde_json::Value = serde_json::from_str(content).ok()?;
    let payload = DrillPayload::from_value(&value).ok()?;
    Some(map_payload(&payload, SAMPLE_NAME))
}
