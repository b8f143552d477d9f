pub mod assistant;
pub mod fallback;
pub mod info;
pub mod matchers;
pub mod resolver;

pub use crate::domain::model::{AccountContext, AccountDetails, Resolution, Stage};
pub use crate::domain::ports::{AccountStore, BackendError, ConfigProvider, GenerativeBackend};
pub use crate::utils::error::Result;
