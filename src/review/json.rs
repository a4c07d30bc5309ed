use std::error::Error;

use super::Assessment;
use crate::report_helpers;

pub fn print_json(assessment: &Assessment) -> Result<(), Box<dyn Error>> {
    report_helpers::print_json_stdout(assessment)
}
