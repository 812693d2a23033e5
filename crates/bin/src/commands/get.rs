//! Point read command.

use crate::cli::GetArgs;
use crate::document;
use crate::output::{OutputFormat, print_json};

pub fn run(args: &GetArgs, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let doc = document::load(&args.document)?;
    let Some(value) = doc.get(&args.path) else {
        return Err(format!("No value at path {}", args.path).into());
    };

    match format {
        OutputFormat::Human => println!("{value}"),
        OutputFormat::Json => print_json(&value.to_json(), format)?,
    }

    Ok(())
}
