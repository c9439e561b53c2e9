//! `gangway layout` command

use anyhow::Result;

use crate::cli::LayoutArgs;
use gangway::TargetData;

pub fn execute(args: LayoutArgs) -> Result<()> {
    let td = TargetData::from_layout(&args.layout)?;

    println!("byte order:   {}", td.byte_order());
    println!(
        "pointer size: {} bytes (address space {})",
        td.pointer_size(args.address_space),
        args.address_space
    );
    println!("canonical:    {}", td.string_rep());

    Ok(())
}
