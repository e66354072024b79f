mod actor;

pub use actor::{keys, StorageActor, StorageActorHandle};
