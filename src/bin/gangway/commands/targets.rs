//! `gangway targets` command

use anyhow::Result;

use gangway::core::platform;
use gangway::discovery;

pub fn execute() -> Result<()> {
    let installation = discovery::installation()?;

    if installation.targets.is_empty() {
        println!("no backend list available (query tool was not found)");
        return Ok(());
    }

    for target in &installation.targets {
        if platform::is_known_target(target) {
            println!("{}", target);
        } else {
            println!("{} (unrecognized)", target);
        }
    }

    Ok(())
}
