pub mod edit;
pub mod get;
pub mod mask;
pub mod merge;
