/// Options for Mongoose schema generation
#[derive(Debug, Clone)]
pub struct MongooseOptions {
    /// Emit the `require('mongoose')` preamble
    pub include_requires: bool,
    /// Emit a trailing `module.exports` with every model
    pub include_exports: bool,
}

impl Default for MongooseOptions {
    fn default() -> Self {
        Self {
            include_requires: true,
            include_exports: true,
        }
    }
}
