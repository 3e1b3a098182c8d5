mod channel;
mod consumer;
mod error;
mod sink;
mod table;

pub use channel::ChannelPublisher;
pub use consumer::ChannelConsumer;
pub use error::DispatchError;
pub use sink::{DispatchStats, Dispatcher, SummarySink};
pub use table::TableWriter;
