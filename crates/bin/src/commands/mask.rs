//! Field mask listing command.

use crate::cli::MaskArgs;
use crate::document;
use crate::output::{OutputFormat, print_table};

pub fn run(args: &MaskArgs, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let doc = document::load(&args.document)?;
    let mask = doc.to_field_mask();

    match format {
        OutputFormat::Human => {
            if mask.is_empty() {
                println!("Document has no fields.");
                return Ok(());
            }
            let rows: Vec<Vec<String>> = mask
                .iter()
                .map(|field| {
                    let value = doc
                        .get(field)
                        .map(ToString::to_string)
                        .unwrap_or_default();
                    vec![field.to_string(), value]
                })
                .collect();
            print_table(&["PATH", "VALUE"], &rows);
        }
        OutputFormat::Json => {
            let fields: Vec<String> = mask.iter().map(ToString::to_string).collect();
            println!("{}", serde_json::to_string(&fields)?);
        }
    }

    Ok(())
}
