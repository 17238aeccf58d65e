use super::Formatter;
use crate::model::Sample;

pub const HEADER: &str = "time,power,voltage,current,energy_kwh_today,cost_today";

pub struct CsvFormatter;

impl Formatter for CsvFormatter {
    fn header(&self) -> Option<String> {
        Some(HEADER.to_string())
    }

    fn format(&self, sample: &Sample) -> Result<String, String> {
        Ok(format!(
            "{},{},{},{},{},{}",
            sample.time_label(),
            sample.power_w,
            sample.voltage_v,
            sample.current_ma,
            sample.energy_kwh_today,
            sample.cost_today,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::{CsvFormatter, HEADER};
    use crate::format::Formatter;
    use crate::model::{Reading, Sample, SwitchState};
    use chrono::{Local, TimeZone};

    #[test]
    fn rows_follow_the_header_column_order() {
        let reading = Reading {
            switch: SwitchState::On,
            power_w: 1200.5,
            voltage_v: 231.5,
            current_ma: 412.0,
        };
        let timestamp = Local.with_ymd_and_hms(2026, 8, 6, 12, 30, 45).unwrap();
        let sample = Sample::build(&reading, timestamp, 0.12345, 1.091);
        let line = CsvFormatter.format(&sample).unwrap();
        assert_eq!(line, "12:30:45,1200.5,231.5,412,0.1234,1.09");
        assert_eq!(HEADER.split(',').count(), line.split(',').count());
    }
}
