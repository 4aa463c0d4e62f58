pub mod embedded_address;
pub mod message_builder;
pub mod record_type_map;
pub mod response_parser;

pub use embedded_address::decode_embedded_address;
pub use message_builder::{FramedQuery, MessageBuilder};
pub use record_type_map::RecordTypeMapper;
pub use response_parser::{response_id, AAnswer, Answer, DirectoryResponse, ResponseParser, SrvAnswer};
