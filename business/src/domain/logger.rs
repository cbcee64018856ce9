/// Logging port used by use cases and infrastructure adapters.
///
/// Adapters decide where messages go; the domain only picks the level.
pub trait Logger: Send + Sync {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
    fn debug(&self, message: &str);
}
