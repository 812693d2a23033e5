//! Point write commands: set and delete.

use docmodel::Value;
use tracing::info;

use crate::cli::{DeleteArgs, SetArgs};
use crate::document;
use crate::output::{OutputFormat, print_document};

pub fn set(args: &SetArgs, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let mut doc = document::load(&args.document)?;
    let json: serde_json::Value = serde_json::from_str(&args.value)?;
    let value = Value::from_json(json)?;

    info!(path = %args.path, kind = value.type_name(), "setting field");
    doc.set(&args.path, value);

    print_document(&doc, format)?;
    Ok(())
}

pub fn delete(args: &DeleteArgs, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let mut doc = document::load(&args.document)?;

    if doc.get(&args.path).is_none() {
        info!(path = %args.path, "field not present, nothing to delete");
    }
    doc.delete(&args.path);

    print_document(&doc, format)?;
    Ok(())
}
