mod authority;
mod storage;
mod update;

pub use authority::AuthoritySettings;
pub use storage::StorageSettings;
pub use update::UpdateSettings;
