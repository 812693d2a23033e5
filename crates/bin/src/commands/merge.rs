//! Field-mask merge command.

use docmodel::FieldMask;
use tracing::info;

use crate::cli::MergeArgs;
use crate::document;
use crate::output::{OutputFormat, print_document};

pub fn run(args: &MergeArgs, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let mut target = document::load(&args.target)?;
    let source = document::load(&args.source)?;

    let mask = if args.mask.is_empty() {
        source.to_field_mask()
    } else {
        args.mask.iter().cloned().collect::<FieldMask>()
    };

    info!(fields = mask.len(), mask = %mask, "merging documents");
    target.set_all(&mask, &source);

    print_document(&target, format)?;
    Ok(())
}
