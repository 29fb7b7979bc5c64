pub const CONFIG_PARSE: &str = "CONFIG_PARSE";
pub const MISSING_ENTRY: &str = "MISSING_ENTRY";
pub const INVALID_OPTION: &str = "INVALID_OPTION";
pub const COMPILATION: &str = "COMPILATION";
pub const OUTPUT_MISMATCH: &str = "OUTPUT_MISMATCH";
pub const IO_ERROR: &str = "IO_ERROR";
pub const PANIC: &str = "PANIC";
