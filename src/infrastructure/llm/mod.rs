mod json_chat_client;

pub use json_chat_client::JsonChatClient;
