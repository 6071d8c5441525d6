pub mod completion_client;
pub mod output_writer;
pub mod web_lookup_client;

pub use completion_client::HttpCompletionClient;
pub use output_writer::OutputWriter;
pub use web_lookup_client::HttpWebLookupClient;
