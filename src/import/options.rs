#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Skip records that fail to parse instead of aborting the load.
    pub skip_errors: bool,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub inserted: u64,
    pub skipped: u64,
}
