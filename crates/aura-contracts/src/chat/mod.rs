mod message;
mod stylist;

pub use message::{Conversation, Message, Role};
pub use stylist::{respond, StylistResponse, GREETING, OPENING_SUGGESTIONS};
