// Adapters layer: concrete collaborators behind the domain ports.

pub mod csv_store;
pub mod gemini;

pub use csv_store::CsvAccountStore;
pub use gemini::GeminiClient;
