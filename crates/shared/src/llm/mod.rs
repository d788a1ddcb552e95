pub mod brain;
pub mod gateway;

pub use brain::{HttpBrainGateway, mentions_data_change};
pub use gateway::{BrainError, BrainFuture, BrainGateway, BrainReply, BrainRequest};
