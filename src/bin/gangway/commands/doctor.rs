//! `gangway doctor` command

use anyhow::Result;

use gangway::ops::{doctor, format_report, DoctorOptions};

pub fn execute(verbose: bool) -> Result<()> {
    let options = DoctorOptions { verbose };

    let report = doctor(options);

    // Print the formatted report
    let output = format_report(&report, verbose);
    print!("{}", output);

    // Exit with error code if required checks failed
    if !report.all_required_passed() {
        std::process::exit(1);
    }

    Ok(())
}
