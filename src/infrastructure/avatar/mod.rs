mod did_render_client;
mod json_file_cache_store;

pub use did_render_client::DidRenderClient;
pub use json_file_cache_store::JsonFileCacheStore;
