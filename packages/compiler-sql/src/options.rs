/// Options for DDL generation
#[derive(Debug, Clone)]
pub struct SqlOptions {
    /// Length used for VARCHAR/CHAR columns that don't declare one
    pub default_string_length: u32,
    /// Emit `CREATE TABLE IF NOT EXISTS`
    pub if_not_exists: bool,
    /// (precision, scale) for DECIMAL columns
    pub decimal_precision: (u32, u32),
}

impl Default for SqlOptions {
    fn default() -> Self {
        Self {
            default_string_length: 255,
            if_not_exists: true,
            decimal_precision: (10, 2),
        }
    }
}
