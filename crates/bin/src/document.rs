//! Loading documents from files or stdin.

use std::{
    fs,
    io::{self, Read},
    path::Path,
};

use docmodel::ObjectValue;
use tracing::debug;

/// Read a JSON object document from `path`, or from stdin when `path` is `-`.
pub fn load(path: &Path) -> docmodel::Result<ObjectValue> {
    let text = if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(path)?
    };
    debug!(source = %path.display(), bytes = text.len(), "loaded document");
    ObjectValue::from_json_str(&text)
}
