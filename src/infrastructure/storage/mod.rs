mod azure_store;
mod local_store;
mod object_io;
mod store_factory;

pub use azure_store::AzureBlobStore;
pub use local_store::LocalBlobStore;
pub use store_factory::BlobStoreFactory;
