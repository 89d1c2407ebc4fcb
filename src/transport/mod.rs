//! Network access: the [`Transport`] seam, its HTTP implementation and
//! credential discovery.

pub mod credentials;
pub mod http;
pub mod traits;

pub use http::{HttpTransport, TransportConfig};
pub use traits::{BodyStream, FetchRequest, FetchResponse, Transport};
