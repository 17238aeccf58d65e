use super::Formatter;
use crate::model::Sample;

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format(&self, sample: &Sample) -> Result<String, String> {
        serde_json::to_string(sample).map_err(|err| err.to_string())
    }
}
